//! HireSense CLI
//!
//! Terminal client for the HireSense backend: résumé analysis, mock
//! interviews, STAR bullet rewriting and PDF scorecards.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hiresense_client::ApiClient;
use hiresense_core::forms::{self, UploadForm};
use hiresense_core::{
    AnswerOutcome, Config, HireSenseError, InterviewContext, InterviewDriver, ResumeAnalysis,
    ResumeDocument, SessionPhase, StarRewriter, ValidationError, API_URL_ENV,
};
use hiresense_report::json::JsonGenerator;
use hiresense_report::{MarkdownGenerator, Report};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

/// Argument value meaning "read from standard input".
const STDIN_ARG: &str = "-";

/// HireSense - AI resume analysis and mock interviews
///
/// Uploads a PDF resume and a job description to a HireSense backend,
/// then renders the analysis, runs an interactive mock interview, or
/// rewrites resume bullets with the STAR framework.
#[derive(Parser, Debug)]
#[command(name = "hiresense")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: hiresense.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Backend base URL (overrides config and HIRESENSE_API_URL)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Output directory for scorecards and interview reports
    #[arg(short, long, value_name = "DIR", global = true)]
    output_dir: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a resume with a job description and print the analysis
    Analyze {
        /// PDF resume
        #[arg(long, value_name = "FILE")]
        resume: PathBuf,
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
    },

    /// Upload a resume and print the extracted text
    Upload {
        /// PDF resume
        #[arg(long, value_name = "FILE")]
        resume: PathBuf,
    },

    /// Submit a job description and print the cleaned text
    Jd {
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
    },

    /// Score already-extracted resume text against a job description
    Score {
        /// Plain-text resume
        #[arg(long, value_name = "FILE")]
        resume_text: PathBuf,
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
    },

    /// Analyze a resume, then run an interactive mock interview
    Interview {
        /// PDF resume
        #[arg(long, value_name = "FILE")]
        resume: PathBuf,
        /// Job description file
        #[arg(long, value_name = "FILE")]
        jd: String,
    },

    /// Rewrite a resume bullet with the STAR framework
    Rewrite {
        /// The bullet point to rewrite
        #[arg(long, value_name = "TEXT")]
        bullet: String,
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
        /// Extra resume context
        #[arg(long, value_name = "TEXT")]
        context: Option<String>,
    },

    /// Analyze a resume and download the PDF scorecard
    Scorecard {
        /// PDF resume
        #[arg(long, value_name = "FILE")]
        resume: PathBuf,
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
        /// Name printed on the scorecard
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Generate interview questions for extracted resume text
    Questions {
        /// Plain-text resume
        #[arg(long, value_name = "FILE")]
        resume_text: PathBuf,
        /// Job description file, or - for stdin
        #[arg(long, value_name = "FILE")]
        jd: String,
        /// Number of questions (default from config)
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(command = ?args.command, "Command");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let client = ApiClient::from_config(&config)?;
    tracing::info!(api_url = %client.base_url(), "HireSense client ready");

    match args.command {
        Command::Analyze { ref resume, ref jd } => {
            let result = analyze(&client, resume, jd).await?;
            print_report(Report::Analysis(&result), args.json)?;
        }
        Command::Upload { ref resume } => {
            let doc = ResumeDocument::load(resume)
                .map_err(|e| fail(&e, forms::generic_failure_message))?;
            let upload = forms::upload_resume(&client, &doc)
                .await
                .map_err(|e| fail(&e, forms::generic_failure_message))?;
            print_report(Report::Upload(&upload), args.json)?;
        }
        Command::Jd { ref jd } => {
            let text = read_text(jd).await?;
            let cleaned = forms::submit_job_description(&client, &text)
                .await
                .map_err(|e| fail(&e, forms::generic_failure_message))?;
            print_report(Report::JobDescription(&cleaned), args.json)?;
        }
        Command::Score {
            ref resume_text,
            ref jd,
        } => {
            let resume_text = std::fs::read_to_string(resume_text)?;
            let jd = read_text(jd).await?;
            let analysis = forms::analyze_text(&client, &resume_text, &jd)
                .await
                .map_err(|e| fail(&e, forms::generic_failure_message))?;
            print_report(Report::BasicAnalysis(&analysis), args.json)?;
        }
        Command::Interview { ref resume, ref jd } => {
            if jd == STDIN_ARG {
                anyhow::bail!(
                    "The interview reads answers from stdin\n\nSuggestion: Pass the job description as a file"
                );
            }
            let result = analyze(&client, resume, jd).await?;
            run_interview(&client, &config, &result, args.json).await?;
        }
        Command::Rewrite {
            bullet,
            ref jd,
            context,
        } => {
            let mut rewriter = StarRewriter::new(read_text(jd).await?);
            rewriter.bullet = bullet;
            rewriter.resume_context = context.unwrap_or_default();
            let result = rewriter
                .rewrite(&client)
                .await
                .map_err(|e| fail(&e, StarRewriter::failure_message))?;
            print_report(Report::StarRewrite(result), args.json)?;
        }
        Command::Scorecard {
            ref resume,
            ref jd,
            ref name,
        } => {
            let result = analyze(&client, resume, jd).await?;
            let name = name.as_deref().unwrap_or(&config.candidate_name);
            let pdf = forms::download_scorecard(
                &client,
                result.analysis(),
                name,
                None,
                chrono::Local::now().date_naive(),
            )
            .await
            .map_err(|e| fail(&e, forms::scorecard_failure_message))?;
            let path = pdf.save(&config.output_dir)?;
            println!("Scorecard saved to {}", path.display());
        }
        Command::Questions {
            ref resume_text,
            ref jd,
            count,
        } => {
            let context = InterviewContext {
                resume_text: std::fs::read_to_string(resume_text)?,
                job_description: read_text(jd).await?,
                analysis: hiresense_core::AnalysisResult::default(),
            };
            let count = count.unwrap_or(config.question_count);
            let questions = forms::generate_questions(&client, &context, count)
                .await
                .map_err(|e| fail(&e, forms::generic_failure_message))?;
            print_report(Report::Questions(&questions), args.json)?;
        }
    }

    Ok(())
}

/// Loads configuration and applies environment and CLI overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match args.config.as_deref() {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path)?
        }
        None => Config::load()?,
    };

    if config.apply_env_override(std::env::var(API_URL_ENV).ok()) {
        tracing::debug!(api_url = %config.api_url, "API URL taken from {API_URL_ENV}");
    }
    if let Some(ref api_url) = args.api_url {
        config.api_url.clone_from(api_url);
    }
    if let Some(ref output_dir) = args.output_dir {
        config.output_dir.clone_from(output_dir);
    }

    // Re-validate after overrides
    config.validate()?;
    Ok(config)
}

/// Logs the underlying error and turns it into the message a user sees.
fn fail(err: &HireSenseError, message: fn(&HireSenseError) -> String) -> anyhow::Error {
    tracing::debug!(error = %err, "Request failed");
    anyhow::anyhow!(message(err))
}

/// Reads text from a file, or from stdin when `source` is `-`.
async fn read_text(source: &str) -> anyhow::Result<String> {
    if source == STDIN_ARG {
        return Ok(read_all(tokio::io::stdin()).await?);
    }
    Ok(tokio::fs::read_to_string(source).await?)
}

/// Reads `reader` to the end without altering line endings.
async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

/// Runs the upload/analyze flow for a résumé path.
///
/// A missing file is left unselected so the form reports it.
async fn analyze(client: &ApiClient, resume: &Path, jd: &str) -> anyhow::Result<ResumeAnalysis> {
    let mut form = UploadForm::new();
    match form.select_path(resume) {
        Ok(()) => {}
        Err(HireSenseError::Validation(ValidationError::MissingResume)) => {
            tracing::debug!(path = %resume.display(), "Resume not found");
        }
        Err(e) => return Err(fail(&e, UploadForm::failure_message)),
    }
    form.job_description = read_text(jd).await?;

    form.submit(client)
        .await
        .map_err(|e| fail(&e, UploadForm::failure_message))
}

/// Runs the interactive interview loop on stdin.
async fn run_interview(
    client: &ApiClient,
    config: &Config,
    result: &ResumeAnalysis,
    json: bool,
) -> anyhow::Result<()> {
    let mut driver = InterviewDriver::from_analysis(client, result, &config.fallback_questions);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let first = driver.start()?;
        print_transcript_tail(&driver, 0);
        println!("\n[{}] {first}", driver.session().question_label());

        while !driver.session().phase().is_finished() {
            let answer = prompt(&mut input, "> ").await?;
            let before = driver.session().messages().len();
            match driver.answer(&answer).await {
                Ok(AnswerOutcome::NextQuestion(question)) => {
                    print_transcript_tail(&driver, before + 1);
                    println!("\n[{}] {question}", driver.session().question_label());
                }
                Ok(AnswerOutcome::Finished) => print_transcript_tail(&driver, before + 1),
                Err(HireSenseError::Validation(ValidationError::EmptyAnswer)) => {
                    println!("{}", ValidationError::EmptyAnswer);
                }
                Err(e) => return Err(e.into()),
            }
        }

        if driver.session().phase() == SessionPhase::Done {
            println!();
            print_report(Report::Interview(driver.session()), json)?;
            write_interview_reports(&driver, &config.output_dir)?;
        }

        let again = prompt(&mut input, "\nRestart the interview? [y/N] ").await?;
        if !again.trim().eq_ignore_ascii_case("y") {
            break;
        }
        driver.restart()?;
    }

    Ok(())
}

/// Prints transcript messages from `from` onward, skipping questions (the
/// loop prints those with their label).
fn print_transcript_tail(driver: &InterviewDriver<'_, ApiClient>, from: usize) {
    for message in driver.session().messages().iter().skip(from) {
        if message.kind == hiresense_core::MessageKind::Question {
            continue;
        }
        println!("\n{}", message.content);
    }
}

/// Prints a prompt and reads one line from stdin.
async fn prompt(input: &mut Lines<BufReader<Stdin>>, text: &str) -> anyhow::Result<String> {
    use std::io::Write;

    print!("{text}");
    std::io::stdout().flush()?;
    input
        .next_line()
        .await?
        .ok_or_else(|| anyhow::anyhow!("Interview aborted: standard input closed"))
}

/// Writes the interview transcript as Markdown and JSON to the output directory.
fn write_interview_reports(
    driver: &InterviewDriver<'_, ApiClient>,
    output_dir: &str,
) -> anyhow::Result<()> {
    let session = driver.session();
    let dir = PathBuf::from(output_dir);
    std::fs::create_dir_all(&dir)?;

    let stem = format!("hiresense-interview-{}", session.session_id);
    let md_path = dir.join(format!("{stem}.md"));
    std::fs::write(&md_path, MarkdownGenerator::new(Report::Interview(session)).generate())?;

    let json_path = dir.join(format!("{stem}.json"));
    JsonGenerator::new(Report::Interview(session)).write_to_file(&json_path, true)?;

    println!("Interview reports written:");
    println!("  Markdown: {}", md_path.display());
    println!("  JSON: {}", json_path.display());
    Ok(())
}

/// Prints a report to stdout as Markdown or pretty JSON.
fn print_report(report: Report<'_>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", JsonGenerator::new(report).generate_pretty()?);
    } else {
        print!("{}", MarkdownGenerator::new(report).generate());
    }
    Ok(())
}
