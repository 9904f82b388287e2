use anyhow::Result;
use dev_argparse::{Config, OptionKind, OptionSpec};

/// `dev panel-command` — parse its own argv and echo the result.
pub fn execute(argv: &[String]) -> Result<()> {
    tracing::debug!("executing panel-command");

    let config = Config {
        prefix: "dev panel-command <command>".to_string(),
        options: vec![
            OptionSpec::new("help", OptionKind::Bool)
                .alias("h")
                .description("Displays help"),
            OptionSpec::new("global", OptionKind::Bool)
                .alias("g")
                .description("Use global configuration"),
        ],
        ..Default::default()
    };

    let result = dev_argparse::parse(argv, &config);
    println!("{argv:?} {result:?}");
    Ok(())
}
