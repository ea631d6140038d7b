use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use subclash::utils::{fetch_subscription, read_subscription_file};
use subclash::{check, derive_template, explode, explode_sub, generate, ProxyNode, Settings};

/// Convert proxy share links and subscriptions into a Clash Meta configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subscription URL
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// Local subscription file
    #[arg(long, value_name = "FILE")]
    file: Option<String>,

    /// Extra share links, appended after the subscription nodes
    #[arg(long, value_name = "LINK", num_args = 1..)]
    nodes: Vec<String>,

    /// Output YAML file
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// Name of the main proxy group
    #[arg(long, value_name = "NAME")]
    proxy_group: Option<String>,

    /// YAML template with PROXY_NODES placeholders
    #[arg(long, value_name = "FILE")]
    template: Option<String>,

    /// Path to a settings file (.toml or .yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Print the parsed nodes without writing a configuration
    #[arg(long)]
    test: bool,

    /// Convert an existing Clash configuration into a PROXY_NODES template
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["url", "file", "nodes", "test", "template"]
    )]
    import_template: Option<String>,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("failed to load settings from {}", path))?,
        None => Settings::default(),
    };

    if let Some(output) = &args.output {
        settings.output = output.clone();
    }
    if let Some(group) = &args.proxy_group {
        settings.proxy_group_name = group.clone();
    }
    if let Some(template) = &args.template {
        settings.template_path = Some(template.clone());
    }
    Ok(settings)
}

fn collect_nodes(args: &Args, settings: &Settings) -> Result<Vec<ProxyNode>> {
    let mut nodes = Vec::new();

    let subscription = match (&args.url, &args.file) {
        (Some(url), _) => Some(fetch_subscription(
            url,
            settings.fetch_timeout,
            &settings.user_agent,
        )?),
        (None, Some(file)) => Some(read_subscription_file(file)?),
        (None, None) => None,
    };
    if let Some(content) = subscription {
        let parsed = explode_sub(&content);
        if parsed.is_empty() {
            warn!("No nodes could be parsed from the subscription");
        } else {
            info!("Parsed {} nodes from the subscription", parsed.len());
        }
        nodes.extend(parsed);
    }

    for link in &args.nodes {
        match explode(link) {
            Some(node) => {
                info!("Parsed node {}", node.summary());
                nodes.push(node);
            }
            None => warn!(
                "Failed to parse node: {}",
                link.chars().take(50).collect::<String>()
            ),
        }
    }

    if nodes.is_empty() {
        bail!("no proxy nodes were parsed");
    }
    Ok(nodes)
}

fn print_nodes(nodes: &[ProxyNode]) {
    println!("{}", "=".repeat(60));
    for (index, node) in nodes.iter().enumerate() {
        println!("Node {}:", index + 1);
        println!("  name:   {}", node.name());
        println!("  type:   {}", node.proxy_type().clash_type());
        println!("  server: {}", node.server().unwrap_or_default());
        println!(
            "  port:   {}",
            node.port().map(|p| p.to_string()).unwrap_or_default()
        );
    }
    println!("{}", "=".repeat(60));
}

fn import_template(path: &str, settings: &Settings) -> Result<()> {
    let config =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let template = derive_template(&config)?;

    let yaml = template.to_yaml_string()?;
    std::fs::write(&settings.output, yaml)
        .with_context(|| format!("failed to write {}", settings.output))?;

    println!("Template written to {}", settings.output);
    println!("  proxy groups: {}", template.count("proxy-groups"));
    Ok(())
}

fn run(args: &Args, settings: &Settings) -> Result<()> {
    if let Some(path) = &args.import_template {
        return import_template(path, settings);
    }
    if args.url.is_none() && args.file.is_none() && args.nodes.is_empty() {
        bail!("no input source given, use --url, --file or --nodes");
    }

    let nodes = collect_nodes(args, settings)?;
    info!("Total: {} proxy nodes", nodes.len());

    if args.test {
        print_nodes(&nodes);
        return Ok(());
    }

    let template = match &settings.template_path {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path))?,
        ),
        None => None,
    };

    let document = generate(&nodes, &settings.proxy_group_name, template.as_deref())?;
    check(&document).context("generated configuration is invalid")?;

    let yaml = document.to_yaml_string()?;
    std::fs::write(&settings.output, yaml)
        .with_context(|| format!("failed to write {}", settings.output))?;

    println!("Configuration written to {}", settings.output);
    println!("  proxies:      {}", document.count("proxies"));
    println!("  proxy groups: {}", document.count("proxy-groups"));
    println!("  rules:        {}", document.count("rules"));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = load_settings(&args);
    let log_level = settings
        .as_ref()
        .map(|s| s.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::init_from_env(Env::default().default_filter_or(log_level));

    match settings.and_then(|settings| run(&args, &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
