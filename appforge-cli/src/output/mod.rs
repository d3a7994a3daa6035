//! Event rendering for the terminal.

use appforge_core::OrchestrationEvent;

use crate::{Cli, OutputFormat};

/// Renders one orchestration event.
///
/// JSON mode emits one object per line. In quiet text mode only terminal
/// events are shown.
pub fn render_event(event: &OrchestrationEvent, cli: &Cli) {
    if cli.format == OutputFormat::Json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }

    if cli.quiet && !event.is_terminal() {
        return;
    }

    match event {
        OrchestrationEvent::Progress(text) => println!("• {text}"),
        OrchestrationEvent::Completed(url) => {
            if cli.no_color {
                println!("✓ {url}");
            } else {
                println!("\x1b[32m✓\x1b[0m {url}");
            }
        }
        OrchestrationEvent::Failed(message) => {
            if cli.no_color {
                eprintln!("✗ {message}");
            } else {
                eprintln!("\x1b[31m✗\x1b[0m {message}");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_events_serialize_one_object_per_line() {
        let event = OrchestrationEvent::Completed("https://acme.forgeapps.dev/p/x".to_string());
        let line = serde_json::to_string(&event).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("completed"));
    }

    #[test]
    fn test_render_does_not_panic() {
        let cli = crate::Cli::parse_from(["appforge", "check", "--quiet", "--no-color"]);
        render_event(&OrchestrationEvent::Progress("working".to_string()), &cli);
        render_event(&OrchestrationEvent::Failed("oops".to_string()), &cli);
    }
}
