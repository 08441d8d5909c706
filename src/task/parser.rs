use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use sha2::{Digest, Sha256};

use super::{Task, TaskId, TaskTime};

// Minutes are taken verbatim, `12:75` is still a timed task. Only ASCII digits count.
static TIMED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{1,2})\s+(.+)$").expect("Timed line pattern is always valid.")
});

struct ParsedLine {
    time: Option<TaskTime>,
    description: String,
}

/// Parses the free-text task list, one task per non-blank line, in line order.
///
/// Lines that look like `H:MM description` become timed tasks, everything else
/// becomes a general task. Nothing here fails: malformed lines are general tasks.
///
/// Ids are derived from the line's content, so parsing the same text again
/// (or the same lines in a different order) yields the same ids. Repeated
/// lines get an occurrence suffix: `general_<hash>`, `general_<hash>-2`, ...
pub fn parse_tasks(raw: &str) -> Vec<Task> {
    let mut occurrences = HashMap::<String, usize>::new();

    raw.lines()
        .filter_map(parse_line)
        .map(|line| {
            let base_id = base_id(&line);
            let occurrence = occurrences.entry(base_id.clone()).or_insert(0);
            *occurrence += 1;

            let id = if *occurrence == 1 {
                TaskId::new(base_id)
            } else {
                TaskId::new(format!("{base_id}-{occurrence}"))
            };

            match line.time {
                Some(time) => Task::Timed {
                    id,
                    time,
                    description: line.description,
                },
                None => Task::General {
                    id,
                    description: line.description,
                },
            }
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(captures) = TIMED_LINE.captures(line) {
        return Some(ParsedLine {
            time: Some(TaskTime::from_parts(&captures[1], &captures[2])),
            description: captures[3].trim().to_owned(),
        });
    }

    Some(ParsedLine {
        time: None,
        description: line.to_owned(),
    })
}

fn base_id(line: &ParsedLine) -> String {
    let digest = description_digest(&line.description);
    match &line.time {
        Some(time) => format!("timed_{}_{}", time.as_str().replace(':', ""), &digest[..8]),
        None => format!("general_{}", &digest[..12]),
    }
}

fn description_digest(description: &str) -> String {
    let normalized = description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{digest:x}")
}
