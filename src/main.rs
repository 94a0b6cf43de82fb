use mailstage::app::{self, Config, Step};

const USAGE: &str = "Usage: mailstage [schema|stage|project|run] [--version]";

#[tokio::main]
async fn main() {
  // Minimal CLI: one optional step name, plus --version/--help
  let mut args = std::env::args().skip(1);
  let step = match args.next().as_deref() {
    None | Some("run") => None,
    Some("schema") => Some(Step::EnsureSchema),
    Some("stage") => Some(Step::StageSample),
    Some("project") => Some(Step::ProjectAll),
    Some("--version") | Some("-V") => {
      println!("mailstage {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    Some("--help") | Some("-h") => {
      eprintln!("{USAGE}");
      return;
    }
    Some(other) => {
      eprintln!("unknown command: {other}\n{USAGE}");
      std::process::exit(2);
    }
  };

  if let Err(e) = start(step).await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}

async fn start(step: Option<Step>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let config = Config::from_env()?;
  let report = app::run(config, step).await?;
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
