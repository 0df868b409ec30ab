//! Three buttons on a phone-sized screen, each with its popover, written to
//! stdout as SVG. Run with `RUST_LOG=debug` and `--features tracing` to see
//! the layout decisions.

use textpopover::{
    ArrowDirection, Color, PopoverRenderer, ProportionalMeasurer, Rect, SvgRenderer, TextPopover,
};
use tracing_subscriber::EnvFilter;

const SCREEN: Rect = Rect::new(0.0, 0.0, 375.0, 667.0);

struct Button {
    title: &'static str,
    frame: Rect,
    message: &'static str,
    arrow: ArrowDirection,
    width: f64,
}

fn button_at(title: &'static str, cx: f64, cy: f64) -> Rect {
    let w = 10.0 * title.len() as f64 + 16.0;
    let h = 30.0;
    Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let center = SCREEN.center();
    let buttons = [
        Button {
            title: "Right",
            frame: button_at("Right", center.x + 180.0, center.y - 230.0),
            message: "Rrrrrrrrrrrrrrrrrrr~",
            arrow: ArrowDirection::Right,
            width: 320.0,
        },
        Button {
            title: "Up",
            frame: button_at("Up", 60.0, center.y),
            message: "Uuuuuppppppppppppppp~",
            arrow: ArrowDirection::Up,
            width: 220.0,
        },
        Button {
            title: "Down",
            frame: button_at("Down", center.x + 180.0, center.y + 230.0),
            message: "Dddddddddddddddddddddddddddd~",
            arrow: ArrowDirection::Down,
            width: 120.0,
        },
    ];

    let measurer = ProportionalMeasurer::new();
    let mut svg = SvgRenderer::new();

    for button in &buttons {
        let label = textpopover::Font::system(14.0);
        svg.draw_text(button.title, button.frame, &label, &Color::named("dodgerblue"));

        let mut popover = TextPopover::new(button.message, &measurer);
        if let Err(e) = popover.set_preferred_width(button.width) {
            eprintln!("Error: {e}");
            continue;
        }
        match popover.show(SCREEN, button.frame, button.arrow) {
            Ok(layout) => tracing::info!(title = button.title, frame = %layout.frame, "popover placed"),
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        }
        popover.draw(&mut svg);
    }

    match svg.finish(SCREEN.width, SCREEN.height) {
        Ok(doc) => println!("{}", doc),
        Err(e) => eprintln!("Error: {}", e),
    }
}
