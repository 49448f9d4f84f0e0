//! HTML rendering for the conversation page and message fragments.
//!
//! Templates are compiled once at startup. All template names end in
//! `.html`, so minijinja auto-escapes every interpolated value.

use minijinja::{Environment, context};
use threadchat_core::conversation::store::ConversationView;
use threadchat_core::exchange::Exchange;

const LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}threadchat{% endblock %}</title>
  <script src="https://unpkg.com/htmx.org@2.0.4" defer></script>
</head>
<body>
{% block body %}{% endblock %}
</body>
</html>
"#;

const MESSAGE: &str = r#"<div class="message message-{{ m.sender }}" id="message-{{ m.id }}">
  <span class="sender">{{ m.sender }}</span>
  <p class="content">{{ m.content }}</p>
  <time datetime="{{ m.created_at }}"></time>
</div>
"#;

const CONVERSATION: &str = r##"{% extends "layout.html" %}
{% block title %}Conversation {{ conversation.id }}{% endblock %}
{% block body %}
<main class="conversation" data-conversation-id="{{ conversation.id }}">
  <section id="messages" class="messages">
{% for m in messages %}{% include "message.html" %}{% endfor %}  </section>
  <form class="compose" method="post" action="/conversations/{{ conversation.id }}/messages"
        hx-post="/conversations/{{ conversation.id }}/messages"
        hx-target="#messages" hx-swap="beforeend"
        hx-on::after-request="if (event.detail.successful) this.reset()">
    <textarea name="content" rows="2" placeholder="Type a message" required></textarea>
    <button type="submit">Send</button>
  </form>
</main>
{% endblock %}
"##;

const EXCHANGE: &str = r#"{% for m in messages %}{% include "message.html" %}{% endfor %}"#;

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("message.html", MESSAGE)?;
        env.add_template("conversation.html", CONVERSATION)?;
        env.add_template("exchange.html", EXCHANGE)?;
        Ok(Self { env })
    }

    /// Full page: every message in order plus an empty compose form.
    pub fn conversation_page(&self, view: &ConversationView) -> Result<String, minijinja::Error> {
        self.env.get_template("conversation.html")?.render(context! {
            conversation => &view.conversation,
            messages => &view.messages,
        })
    }

    /// Fragment with the user and bot message of one exchange, for appending
    /// to `#messages`.
    pub fn exchange_fragment(&self, exchange: &Exchange) -> Result<String, minijinja::Error> {
        self.env.get_template("exchange.html")?.render(context! {
            messages => [&exchange.user_message, &exchange.bot_message],
        })
    }
}
