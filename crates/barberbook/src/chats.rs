// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barberbook chats` subcommands.

use barberbook_chat::chat_id;
use barberbook_core::BarberError;
use clap::Subcommand;

use crate::app::App;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum ChatsCommand {
    /// Show a shop's inbox, or one conversation with --customer.
    List {
        shop_id: String,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Send a message as the shop.
    Send {
        shop_id: String,
        customer_id: String,
        message: String,
        /// Display name shown to the customer.
        #[arg(long)]
        sender_name: Option<String>,
    },
    /// Clear the unread badge of a conversation.
    Read { shop_id: String, customer_id: String },
}

pub async fn run(app: &App, cmd: ChatsCommand, json: bool) -> Result<(), BarberError> {
    match cmd {
        ChatsCommand::List {
            shop_id,
            customer: Some(customer_id),
        } => {
            let messages = app.chat.messages(&chat_id(&shop_id, &customer_id)).await?;
            if json {
                return output::json(&messages);
            }
            for message in messages {
                output::line(format!(
                    "[{}] {}: {}",
                    message.timestamp.format("%Y-%m-%d %H:%M"),
                    message.sender_name,
                    message.content
                ));
            }
            Ok(())
        }
        ChatsCommand::List {
            shop_id,
            customer: None,
        } => {
            let chats = app.chat.chats_for_shop(&shop_id).await?;
            if json {
                return output::json(&chats);
            }
            for chat in chats {
                output::line(format!(
                    "{:<24} unread {:>3}  {}",
                    chat.customer_name,
                    chat.unread_count,
                    chat.last_message.as_deref().unwrap_or("(no messages)")
                ));
            }
            Ok(())
        }
        ChatsCommand::Send {
            shop_id,
            customer_id,
            message,
            sender_name,
        } => {
            let sender_name = match sender_name {
                Some(name) => name,
                None => app
                    .shops
                    .shop(&shop_id)
                    .await?
                    .map(|shop| shop.name)
                    .unwrap_or_else(|| shop_id.clone()),
            };
            let sent = app
                .chat
                .send_message(&shop_id, &customer_id, &message, &shop_id, &sender_name)
                .await?;
            if json {
                return output::json(&sent);
            }
            output::line(format!("sent message {}", sent.id));
            Ok(())
        }
        ChatsCommand::Read {
            shop_id,
            customer_id,
        } => {
            app.chat.mark_messages_as_read(&shop_id, &customer_id).await?;
            if !json {
                output::line("marked as read");
            }
            Ok(())
        }
    }
}
