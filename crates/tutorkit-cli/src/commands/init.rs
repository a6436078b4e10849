//! The `tutorkit init` command: starter config and example bank.

use anyhow::Result;

const STARTER_CONFIG: &str = r#"# tutorkit configuration
# The API key can also come from the TUTORKIT_API_KEY environment variable.
api_key = "${TUTORKIT_API_KEY}"
base_url = "https://api.deepseek.com"
model = "deepseek-chat"
actor_id = "anonymous"
request_timeout_secs = 120
sample_size = 5
parallelism = 4
bank_path = "bank.toml"
log_path = "./tutorkit-logs/interactions.jsonl"
"#;

const STARTER_BANK: &str = r#"[bank]
id = "starter"
name = "Starter Bank"

[[questions]]
id = 1
category = "algebra"
content = "Solve for x: 2x + 3 = 11"

[[questions]]
id = 2
category = "algebra"
content = "Factor the expression x^2 - 5x + 6"

[[questions]]
id = 3
category = "calculus"
content = "What is the derivative of x^3 + 2x?"

[[questions]]
id = 4
category = "geometry"
content = "A circle has radius 3. What is its area?"

[[questions]]
id = 5
category = "arithmetic"
content = "Compute 17 * 23 without a calculator and explain your steps."

[[questions]]
id = 6
category = "algebra"
content = "For which values of k does x^2 + kx + 9 = 0 have exactly one real root?"
"#;

pub fn execute() -> Result<()> {
    write_if_absent("tutorkit.toml", STARTER_CONFIG)?;
    write_if_absent("bank.toml", STARTER_BANK)?;
    println!("Next: set TUTORKIT_API_KEY and run `tutorkit run`.");
    Ok(())
}

fn write_if_absent(path: &str, content: &str) -> Result<()> {
    if std::path::Path::new(path).exists() {
        println!("{path} already exists, skipping");
        return Ok(());
    }
    std::fs::write(path, content)?;
    println!("created {path}");
    Ok(())
}
