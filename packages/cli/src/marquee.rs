//! Headless ticker run.

use selectie_marquee::Marquee;

pub fn run(frames: usize, push: Option<f64>, every: usize) {
    let mut marquee = Marquee::default();
    let every = every.max(1);

    for frame in 1..=frames {
        if let (Some(dx), Some(top)) = (push, marquee.row_mut(0)) {
            top.push(dx);
        }
        marquee.tick();

        if frame % every == 0 || frame == frames {
            let [top, bottom] = marquee.rows();
            println!(
                "frame {frame:>5}  top {:>8.2} ({:+.2} px/f)  bottom {:>8.2} ({:+.2} px/f)",
                top.offset(),
                top.speed(),
                bottom.offset(),
                bottom.speed()
            );
        }
    }

    let [top, _] = marquee.rows();
    println!();
    println!("{}", top.items().join("  ·  "));
}
