use crate::infra::{build_advisor, read_submission, SharedAdvisor};
use clap::Args;
use major_advisor::advisor::codec;
use major_advisor::advisor::{
    write_index_csv, IndexEntry, MajorCatalog, Recommendation, ResultId, StatsSummary,
};
use major_advisor::config::AppConfig;
use major_advisor::error::AppError;
use major_advisor::telemetry::{self, LogSink};
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Questionnaire JSON file, or `-` for stdin
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the result and share token as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ResultsListArgs {
    /// Only list results whose name contains this text
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Emit CSV instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
}

/// Logs go to stderr so command output can be piped.
fn command_advisor(store_dir: Option<PathBuf>) -> Result<SharedAdvisor, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    build_advisor(&config.storage, store_dir)
}

pub(crate) fn run_recommend(args: RecommendArgs, store_dir: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = command_advisor(store_dir)?;
    let input = read_submission(&args.input)?;
    let result = advisor.submit(input)?;
    let token = codec::encode(&result).map_err(|err| AppError::Advisor(err.into()))?;

    if args.json {
        let payload = json!({ "result": result, "token": token });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render_recommendation(&result, advisor.catalog()));
        println!("Share token: {token}");
    }
    Ok(())
}

pub(crate) fn run_decode(token: &str) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = MajorCatalog::from_config(&config.storage)?;
    print!("{}", render_decoded(token, &catalog));
    Ok(())
}

pub(crate) fn run_results_list(
    args: ResultsListArgs,
    store_dir: Option<PathBuf>,
) -> Result<(), AppError> {
    let advisor = command_advisor(store_dir)?;
    let entries = match args.query.as_deref() {
        Some(query) => advisor.search(query),
        None => advisor.index(),
    };

    if args.csv {
        write_index_csv(&entries, std::io::stdout().lock())?;
    } else {
        print!("{}", render_index(&entries, advisor.catalog()));
    }
    Ok(())
}

pub(crate) fn run_results_show(id: &str, store_dir: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = command_advisor(store_dir)?;
    match advisor.get(&ResultId(id.to_string())) {
        Some(result) => print!("{}", render_recommendation(&result, advisor.catalog())),
        None => println!("No saved result with id {id}."),
    }
    Ok(())
}

pub(crate) fn run_stats(store_dir: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = command_advisor(store_dir)?;
    let stats = advisor.stats(major_advisor::advisor::domain::now_millis());
    print!("{}", render_stats(&stats));
    Ok(())
}

pub(crate) fn render_decoded(token: &str, catalog: &MajorCatalog) -> String {
    match codec::decode(token) {
        Some(result) => render_recommendation(&result, catalog),
        None => "Share link is invalid or incomplete.\n".to_string(),
    }
}

pub(crate) fn render_recommendation(result: &Recommendation, catalog: &MajorCatalog) -> String {
    let mut out = format!(
        "Result {} for {} ({})\n",
        result.id,
        result.submission.name,
        result.submission.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    for (position, entry) in result.top.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} [{}] score {:.4}\n",
            position + 1,
            catalog.display_name(&entry.major_id),
            entry.major_id,
            entry.score
        ));
    }
    out.push_str(&result.reasons);
    out.push('\n');
    out
}

pub(crate) fn render_index(entries: &[IndexEntry], catalog: &MajorCatalog) -> String {
    if entries.is_empty() {
        return "No saved results.\n".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let top = entry
                .top
                .first()
                .map(|ranked| catalog.display_name(&ranked.major_id))
                .unwrap_or("-");
            format!(
                "{}  {}  {}  {}\n",
                entry.id,
                entry.created_at.format("%Y-%m-%d"),
                entry.name,
                top
            )
        })
        .collect()
}

pub(crate) fn render_stats(stats: &StatsSummary) -> String {
    let mut out = format!(
        "Total submissions: {}\nLast 7 days: {}\n",
        stats.total_submissions, stats.recent_submissions
    );
    for stat in &stats.top_majors {
        out.push_str(&format!(
            "  {} [{}]: {} ({}%)\n",
            stat.major_name, stat.major_id, stat.count, stat.percentage
        ));
    }
    out
}
