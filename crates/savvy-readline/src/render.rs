//! Colored terminal rendering of controller snapshots.

use colored::Colorize;
use savvy_application::ChatView;
use savvy_core::content::{Article, CATEGORIES, SEASONS, TAGS};
use savvy_core::conversation::DisplayMode;
use savvy_core::preference::PreferenceSet;

/// Tracks what has already been printed so each update only shows changes.
#[derive(Debug, Default)]
pub struct Renderer {
    printed_messages: usize,
    shown_articles: Vec<String>,
    shown_options: Vec<String>,
    editor_shown: bool,
}

impl Renderer {
    /// Forgets everything printed, e.g. after a session reset.
    pub fn rewind(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, view: &ChatView) {
        for message in view.messages.iter().skip(self.printed_messages) {
            if message.is_bot {
                for line in message.text.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
        self.printed_messages = view.messages.len();

        let ids: Vec<String> = view
            .recommended_articles
            .iter()
            .map(|a| a.id.clone())
            .collect();
        if view.results_visible && ids != self.shown_articles {
            print_articles(&view.recommended_articles, view.display_mode);
            println!("{}", "(/back to return to the chat)".bright_black());
            self.shown_articles = ids;
        } else if !view.results_visible {
            self.shown_articles.clear();
        }

        if !view.options.is_empty() && view.options != self.shown_options {
            print_options(&view.options);
        }
        self.shown_options = view.options.clone();

        if view.show_preferences && !self.editor_shown {
            print_preference_editor(&view.preferences);
        }
        self.editor_shown = view.show_preferences;
    }

    /// Prints the preference editor even if it is already showing.
    pub fn reprint_editor(&mut self, view: &ChatView) {
        if view.show_preferences {
            print_preference_editor(&view.preferences);
            self.editor_shown = true;
        }
    }

    /// Prints the current results again, in the current display mode.
    pub fn reprint_articles(&mut self, view: &ChatView) {
        if view.results_visible {
            print_articles(&view.recommended_articles, view.display_mode);
        }
    }
}

pub fn print_options(options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        println!("  {} {}", format!("[{}]", i + 1).bright_yellow(), option.yellow());
    }
}

pub fn print_articles(articles: &[Article], mode: DisplayMode) {
    if articles.is_empty() {
        println!("{}", "No articles match.".bright_black());
        return;
    }
    println!();
    for article in articles {
        match mode {
            DisplayMode::Compact => {
                println!(
                    "  {} {} {}",
                    "•".bright_magenta(),
                    article.title.bold(),
                    format!("({}, {})", article.source, article.published_at).bright_black()
                );
            }
            DisplayMode::Cards => {
                println!("  {}", article.title.bright_magenta().bold());
                println!(
                    "  {}",
                    format!("{} · {}", article.source, article.published_at).bright_black()
                );
                println!("  {}", article.excerpt);
                if !article.tags.is_empty() {
                    println!("  {}", article.tags.join(", ").cyan());
                }
                println!("  {}", article.url.underline());
                println!();
            }
        }
    }
}

pub fn print_preference_editor(current: &PreferenceSet) {
    println!("{}", "Preferences".bright_magenta().bold());
    if current.is_empty() {
        println!("  {}", "none set".bright_black());
    }
    for preference in current {
        println!("  {}: {}", preference.name, preference.value.green());
    }
    println!("  {} {}", "categories:".bright_black(), CATEGORIES.join(", "));
    println!("  {} {}", "seasons:".bright_black(), SEASONS.join(", "));
    println!("  {} {}", "tags:".bright_black(), TAGS.join(", "));
    println!(
        "{}",
        "Set with /prefs category=<..> season=<..> tag=<..>, /prefs clear or /prefs close".bright_black()
    );
}

pub fn print_notice(notice: &str) {
    println!("{}", notice.yellow());
}

pub fn print_help() {
    let lines = [
        ("<text>", "chat about fashion"),
        ("<number>", "pick one of the offered options"),
        ("/prefs", "show the preference editor"),
        ("/prefs key=value ...", "set category, season and tag preferences"),
        ("/prefs clear", "remove all preferences"),
        ("/prefs close", "hide the preference editor"),
        ("/guided", "set preferences step by step"),
        ("/back", "hide results and return to the chat"),
        ("/toggle", "switch between card and compact article view"),
        ("/reset", "start a fresh conversation"),
        ("/key <api-key>", "store a Gemini API key"),
        ("/signin <email> <password>", "sign in"),
        ("/signout", "sign out"),
        ("quit", "exit"),
    ];
    for (usage, what) in lines {
        println!("  {} {}", format!("{usage:<28}").bright_cyan(), what.bright_black());
    }
}
