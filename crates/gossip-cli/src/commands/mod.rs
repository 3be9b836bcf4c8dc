pub mod play;
pub mod tree;

use gossip_core::RenderedLine;

/// One-line description of a rendered option, without its number.
fn describe(line: &RenderedLine) -> String {
    match line {
        RenderedLine::IconText { icon, text } => format!("[{icon}] {text}"),
        RenderedLine::Popup {
            icon,
            text,
            popup_text,
            cost,
            requires_text_entry,
        } => {
            let mut out = format!("[{icon}] {text} ({popup_text}");
            if cost.as_copper() > 0 {
                out.push_str(&format!(" Costs {cost}."));
            }
            if *requires_text_entry {
                out.push_str(" Type a value.");
            }
            out.push(')');
            out
        }
        RenderedLine::Delegate(target) => {
            format!("<menu {} item {}>", target.menu_id, target.item_id)
        }
    }
}
