//! Prints the filtered classification tree.

use selectie_nace::SearchState;
use selectie_nace::registry::{default_synonyms, default_tree};
use selectie_nace_models::Locale;

pub fn run(query: &str, locale: Locale, selected: &[String], expand_all: bool) {
    let tree = default_tree();
    let synonyms = default_synonyms();

    let mut state = SearchState::new();
    state.set_query(query);
    if expand_all {
        state.expand_all(&tree);
    }
    for code in selected {
        state.toggle_select(code);
    }

    let thematic = state.thematic_codes(&synonyms);
    if !thematic.is_empty() {
        println!("Thematic search active: {query} -> {}", thematic.join(", "));
        println!();
    }

    let view = state.view(&tree, &synonyms);
    if view.is_empty() {
        println!("No matches for {query:?}");
        return;
    }

    for row in state.visible_rows(&view) {
        let node = row.node;
        let toggle = if node.children.is_empty() {
            ' '
        } else if row.expanded {
            'v'
        } else {
            '>'
        };
        let check = if row.selected { "[x]" } else { "[ ]" };
        let marker = if node.thematic_match { " *" } else { "" };
        println!(
            "{indent}{toggle} {check} {code:<6} {label} ({count}){marker}",
            indent = "  ".repeat(row.depth),
            code = node.code,
            label = node.label.get(locale),
            count = node.count,
        );
    }

    let total = state.total_selected(&tree);
    if total > 0 {
        println!();
        println!("Selected: {total} companies");
    }
    if state.should_prompt() {
        println!("Request the full selection to export these companies.");
    }
}
