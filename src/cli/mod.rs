use crate::{
    normalize, GenerationRequest, ItineraryPlanner, ParsedItinerary, ProviderKind,
    ProviderSettings,
};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{io::Read, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI entry point for the itinerary tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("generate", sub)) => generate(sub).await,
        Some(("normalize", sub)) => normalize_file(sub),
        Some(("schema", _)) => {
            println!("{}", serde_json::to_string_pretty(&ParsedItinerary::json_schema())?);
            Ok(())
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn command() -> Command {
    Command::new("itinerary")
        .version("0.1.0")
        .about("Generate travel itineraries with an LLM and normalize the answer into day records")
        .subcommand_required(true)
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("NAME")
                .global(true)
                .help("Backend to use: groq, huggingface or ollama (or set AI_PROVIDER)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("Credential for the selected provider (or set GROQ_API_KEY / HUGGINGFACE_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Endpoint of the selected provider (or set GROQ_BASE_URL / OLLAMA_BASE_URL)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model name for the selected provider"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .help("Request timeout in seconds (or set AI_REQUEST_TIMEOUT_SECS)"),
        )
        .subcommand(
            Command::new("generate")
                .about("Run one generation call and print the normalized itinerary as JSON")
                .arg(
                    Arg::new("system")
                        .short('s')
                        .long("system")
                        .value_name("TEXT|@FILE")
                        .required(true)
                        .help("System instruction, or @path to read it from a file"),
                )
                .arg(
                    Arg::new("user")
                        .long("user")
                        .value_name("TEXT|@FILE")
                        .required(true)
                        .help("User instruction, or @path to read it from a file"),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .action(ArgAction::SetTrue)
                        .help("Print the model's raw text instead of the normalized itinerary"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize a saved model response (reads stdin when FILE is omitted)")
                .arg(Arg::new("file").value_name("FILE").index(1)),
        )
        .subcommand(Command::new("schema").about("Print the JSON schema of the structured format"))
}

fn settings_from(matches: &ArgMatches) -> anyhow::Result<ProviderSettings> {
    let mut settings = ProviderSettings::from_env()?;

    if let Some(provider) = matches.get_one::<String>("provider") {
        settings = settings.with_provider(provider.parse::<ProviderKind>()?);
    }
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        settings = settings.with_api_key(api_key.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        settings = settings.with_base_url(base_url.as_str());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        settings = settings.with_model(model.as_str());
    }
    if let Some(timeout) = matches.get_one::<String>("timeout") {
        let seconds: u64 = timeout
            .parse()
            .with_context(|| format!("invalid --timeout value `{timeout}`"))?;
        settings = settings.with_timeout(Duration::from_secs(seconds));
    }

    Ok(settings)
}

/// `@path` reads the file, anything else is taken literally
fn read_instruction(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read instruction file `{path}`")),
        None => Ok(value.to_string()),
    }
}

async fn generate(sub: &ArgMatches) -> anyhow::Result<()> {
    let settings = settings_from(sub)?;
    let planner = ItineraryPlanner::from_settings(&settings)?;

    let system = sub
        .get_one::<String>("system")
        .context("--system is required")?;
    let user = sub.get_one::<String>("user").context("--user is required")?;
    let request = GenerationRequest::new(read_instruction(system)?, read_instruction(user)?);

    info!("Using provider: {}", planner.provider_name());

    if sub.get_flag("raw") {
        let result = planner.generate(&request).await.map_err(|err| {
            error!("Generation failed: {}", err);
            err
        })?;
        println!("{}", result.text);
        return Ok(());
    }

    let itinerary = planner.plan(&request).await.map_err(|err| {
        error!("Generation failed: {}", err);
        err
    })?;

    println!("{}", serde_json::to_string_pretty(&itinerary)?);
    if itinerary.is_empty() {
        bail!("the response could not be turned into a usable itinerary");
    }
    Ok(())
}

fn normalize_file(sub: &ArgMatches) -> anyhow::Result<()> {
    let raw = match sub.get_one::<String>("file") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response file `{path}`"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read response from stdin")?;
            buffer
        }
    };

    let itinerary = normalize(&raw);
    println!("{}", serde_json::to_string_pretty(&itinerary)?);
    if itinerary.is_empty() {
        bail!("no itinerary days found in the response");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_read_instruction_literal() {
        assert_eq!(read_instruction("Plan Goa").unwrap(), "Plan Goa");
        assert!(read_instruction("@/definitely/not/here.txt").is_err());
    }

    #[test]
    fn test_global_flags_reach_subcommands() {
        let matches = command()
            .try_get_matches_from([
                "itinerary",
                "generate",
                "--system",
                "sys",
                "--user",
                "@prompt.txt",
                "--provider",
                "ollama",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(sub.get_one::<String>("user").unwrap(), "@prompt.txt");
        assert_eq!(sub.get_one::<String>("provider").unwrap(), "ollama");
    }
}
