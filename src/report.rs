use crate::error::Result;
use crate::models::{RepositoryTally, RunResult};

pub fn format_text(result: &RunResult) -> String {
    let mut output = String::new();

    for user in &result.users {
        output.push_str(&format!(
            "\n{} {} found for {}\n",
            user.found, result.kind, user.user
        ));
        for item in &user.items {
            output.push_str(&format!("[{}]\t{}\t{}\n", item.number, item.title, item.url));
        }

        output.push_str(&format!("\nContributions by {}:\n", user.user));
        push_tally(&mut output, &user.by_repository);
        output.push_str(&format!("\t\tTotal: {}\n", user.retained));
    }

    if result.is_team_run() {
        output.push_str("\nFor all members of the team:\n");
        push_tally(&mut output, &result.team);
        output.push_str(&format!("\t\tTotal: {}\n", result.total_retained()));
    }

    output.push_str(&format!(
        "\nGenerated on: {}\n",
        result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn push_tally(output: &mut String, tally: &RepositoryTally) {
    if tally.is_empty() {
        output.push_str("  (none)\n");
        return;
    }
    for (repository, count) in tally.iter() {
        output.push_str(&format!("  {}: {}\n", repository, count));
    }
}

pub fn format_json(result: &RunResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
