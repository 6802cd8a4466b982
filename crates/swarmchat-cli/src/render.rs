//! Plain-text rendering
//!
//! A pure function from a state snapshot to the display text. The
//! coordinator decides *when* to repaint (refreshes are gated during backlog
//! replay); this module only decides *what* a repaint looks like. Messages
//! from blocked users are filtered here, at display time, never from
//! storage.

use swarmchat_core::StateSnapshot;

/// Render the full display tree for a snapshot
pub fn render(snapshot: &StateSnapshot, max_messages: usize) -> String {
    let mut out = String::new();

    let identity = if snapshot.verified {
        snapshot.username.clone()
    } else {
        format!("{} (unverified)", snapshot.username)
    };
    out.push_str(&format!(
        "── swarmchat · {identity} · {} peer{} ──\n",
        snapshot.peers,
        if snapshot.peers == 1 { "" } else { "s" }
    ));

    out.push_str("channels: ");
    let channel_list: Vec<String> = snapshot
        .channels
        .iter()
        .map(|c| {
            let marker = if c.active { "*" } else { "" };
            if c.peers > 0 {
                format!("#{}{} ({})", c.name, marker, c.peers)
            } else {
                format!("#{}{}", c.name, marker)
            }
        })
        .collect();
    out.push_str(&channel_list.join("  "));
    out.push('\n');

    if let Some(active) = &snapshot.active_channel {
        out.push_str(&format!("─ #{active} ─\n"));
    }

    let blocked: Vec<&str> = snapshot
        .users
        .iter()
        .filter(|u| u.blocked)
        .map(|u| u.username.as_str())
        .collect();

    let visible: Vec<_> = snapshot
        .messages
        .iter()
        .filter(|m| !blocked.contains(&m.author.as_str()))
        .collect();
    let tail_start = visible.len().saturating_sub(max_messages);
    for message in &visible[tail_start..] {
        let mark = if message.highlight { "!" } else { " " };
        let mut lines = message.text.lines();
        if let Some(first) = lines.next() {
            out.push_str(&format!(
                "{mark}{:>16} │ {}: {first}\n",
                message.timeago, message.username
            ));
        }
        for continuation in lines {
            out.push_str(&format!("{mark}{:>16} │ {continuation}\n", ""));
        }
    }

    out
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
