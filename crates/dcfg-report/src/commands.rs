//! Vendor console command generation.
//!
//! Each field renders through its schema `CommandSpec` to zero, one, or
//! an indexed family of commands. Fields without a mapping never appear
//! in command output; the document codec is the lossless format.

use tracing::debug;

use dcfg_model::{ConfigModel, ConfigValue, Group};
use dcfg_schema::SchemaVersion;

use crate::document::REDACTED;

/// Rendering options for [`render_commands`].
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Emit a `# <Group>` header line above each group.
    pub group_headers: bool,
    /// Join indexed families into single `Backlog` lines.
    pub aggregate: bool,
    /// Replace sensitive text values with [`REDACTED`].
    pub redact_sensitive: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            group_headers: true,
            aggregate: false,
            redact_sensitive: false,
        }
    }
}

/// One rendered command before line assembly.
struct Command {
    name: &'static str,
    index: Option<u16>,
    value: String,
}

/// Render a model as console commands, grouped and ordered.
///
/// Groups appear in [`Group::ALL`] order; within a group, commands sort
/// by (name, index). Sequence fields emit one command per element with
/// 1-based indices. Rendering never mutates the model.
pub fn render_commands(
    model: &ConfigModel,
    schema: &SchemaVersion<'_>,
    options: &CommandOptions,
) -> String {
    let mut by_group: Vec<(Group, Vec<Command>)> =
        Group::ALL.iter().map(|g| (*g, Vec::new())).collect();

    for entry in model.iter() {
        let Some(descriptor) = schema.get(&entry.name) else {
            continue;
        };
        let Some(spec) = descriptor.command else {
            continue;
        };
        let Some((_, commands)) = by_group.iter_mut().find(|(g, _)| *g == entry.group) else {
            continue;
        };
        let redact = options.redact_sensitive && entry.sensitive;
        match &entry.value {
            ConfigValue::IntSequence(values) => {
                for (i, n) in values.iter().enumerate() {
                    commands.push(Command {
                        name: spec.name,
                        index: Some(i as u16 + 1),
                        value: n.to_string(),
                    });
                }
            }
            ConfigValue::TextSequence(texts) => {
                for (i, text) in texts.iter().enumerate() {
                    commands.push(Command {
                        name: spec.name,
                        index: Some(i as u16 + 1),
                        value: rendered_text(text, redact),
                    });
                }
            }
            value => commands.push(Command {
                name: spec.name,
                index: spec.index,
                value: scalar(value, redact),
            }),
        }
    }

    let mut out = String::new();
    for (group, mut commands) in by_group {
        if commands.is_empty() {
            continue;
        }
        commands.sort_by(|a, b| (a.name, a.index).cmp(&(b.name, b.index)));
        if options.group_headers {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("# ");
            out.push_str(group.as_str());
            out.push('\n');
        }
        emit_group(&mut out, &commands, options.aggregate);
    }
    debug!(bytes = out.len(), "rendered console commands");
    out
}

/// Emit one group's sorted commands, aggregating indexed runs on request.
fn emit_group(out: &mut String, commands: &[Command], aggregate: bool) {
    let mut start = 0;
    while start < commands.len() {
        let mut end = start + 1;
        while end < commands.len() && commands[end].name == commands[start].name {
            end += 1;
        }
        let run = &commands[start..end];
        let indexed_family = run.len() > 1 && run.iter().all(|c| c.index.is_some());
        if aggregate && indexed_family {
            out.push_str("Backlog ");
            for (i, command) in run.iter().enumerate() {
                if i > 0 {
                    out.push_str("; ");
                }
                push_command(out, command);
            }
            out.push('\n');
        } else {
            for command in run {
                push_command(out, command);
                out.push('\n');
            }
        }
        start = end;
    }
}

fn push_command(out: &mut String, command: &Command) {
    out.push_str(command.name);
    if let Some(index) = command.index {
        out.push_str(&index.to_string());
    }
    out.push(' ');
    out.push_str(&command.value);
}

fn scalar(value: &ConfigValue, redact: bool) -> String {
    match value {
        ConfigValue::Flag(flag) => u8::from(*flag).to_string(),
        ConfigValue::Integer(n) => n.to_string(),
        ConfigValue::Float(x) => x.to_string(),
        ConfigValue::Text(text) => rendered_text(text, redact),
        // Sequences are expanded by the caller.
        ConfigValue::IntSequence(_) | ConfigValue::TextSequence(_) => String::new(),
    }
}

fn rendered_text(text: &str, redact: bool) -> String {
    if redact {
        REDACTED.to_string()
    } else {
        text.to_string()
    }
}
