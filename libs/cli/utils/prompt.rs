use std::io::{self, Write};

/// Hidden password prompt, skipped when the value was already provided
/// on the command line (scripting escape hatch).
pub fn password(label: &str, provided: Option<String>) -> eyre::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    Ok(rpassword::prompt_password(label)?)
}

pub fn confirm(question: &str) -> eyre::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
