mod contact_form;
mod error;
mod nav_bar;
mod page_view;
mod player_bar;

pub use contact_form::{ContactFormView, FORM_HEIGHT};
pub use error::ErrorMsg;
pub use nav_bar::NavBar;
pub use page_view::PageView;
pub use player_bar::PlayerBar;

const PREV_ICON: &str = "⏮";
const NEXT_ICON: &str = "⏭";
const INLINE_BAR_WIDTH: usize = 12;

/// Fixed-width text progress bar for inline controls.
fn text_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "━".repeat(filled), "─".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::text_bar;

    #[test]
    fn text_bar_fills_proportionally() {
        assert_eq!(text_bar(0.0, 4), "────");
        assert_eq!(text_bar(0.5, 4), "━━──");
        assert_eq!(text_bar(3.0, 4), "━━━━");
        assert_eq!(text_bar(f64::NAN, 4).chars().count(), 4);
    }
}
