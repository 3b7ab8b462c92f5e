//! `chatlog show`: print the stored conversation for a session.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatlog_types::conversation::{Conversation, ConversationStatus};
use chatlog_types::message::MessageRole;

use crate::state::AppState;

const PREVIEW_CHARS: usize = 80;

/// Show the conversation (and legacy session, if any) for `session_id`.
///
/// # Examples
///
/// ```bash
/// chatlog show session-1712345678901-0.42
/// chatlog show session-1712345678901-0.42 --json
/// ```
pub async fn show_conversation(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let service = &state.transcript_service;
    let conversation = service.find_conversation(session_id).await?;
    let legacy = service.find_legacy_session(session_id).await?;

    if json {
        let out = serde_json::json!({
            "conversation": conversation,
            "chat_session": legacy,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let Some(conversation) = conversation else {
        println!();
        println!(
            "  {} No conversation found for session '{}'",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        if let Some(legacy) = legacy {
            println!(
                "  A legacy chat session exists with {} message(s).",
                legacy.message_history.len()
            );
        }
        println!();
        return Ok(());
    };

    print_header(&conversation);
    println!("{}", message_table(&conversation));
    println!();
    if let Some(legacy) = legacy {
        println!(
            "  Legacy chat session: {} message(s), last activity {}",
            legacy.message_history.len(),
            legacy.last_activity_at.as_deref().unwrap_or("-")
        );
        println!();
    }
    Ok(())
}

fn print_header(conversation: &Conversation) {
    let status = match conversation.status {
        ConversationStatus::Active => style("active").green(),
        ConversationStatus::Ended => style("ended").dim(),
    };
    println!();
    println!(
        "  Conversation {} ({})",
        style(&conversation.id).cyan().bold(),
        status
    );
    println!("  Email:        {}", conversation.email);
    println!("  Session:      {}", conversation.session_id);
    println!("  Started:      {}", conversation.started_at);
    println!(
        "  Last message: {}",
        conversation.last_message_at.as_deref().unwrap_or("-")
    );
    if let Some(metadata) = &conversation.metadata {
        if let Some(ua) = &metadata.user_agent {
            println!("  User agent:   {ua}");
        }
        if let Some(ip) = &metadata.ip_address {
            println!("  IP address:   {ip}");
        }
    }
    println!();
}

fn message_table(conversation: &Conversation) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for message in &conversation.messages {
        let role = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(&message.timestamp).fg(Color::DarkGrey),
            role,
            Cell::new(preview(&message.content)),
        ]);
    }
    table
}

fn preview(content: &str) -> String {
    let single_line = content.replace('\n', " ");
    if single_line.chars().count() > PREVIEW_CHARS {
        let cut: String = single_line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}
