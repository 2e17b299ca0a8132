use clap::{Parser, Subcommand};
use client::ReviewClient;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base url of the review server
    #[arg(long, env = "COURSES_SERVER", default_value = "http://localhost:1111")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit every review in a JSON array file
    Import { file: std::path::PathBuf },

    /// List the reviews of a course
    Reviews { course_code: String },

    /// Show the averages of a course
    Stats { course_code: String },

    /// Suggest courses for a student
    Recommend {
        #[arg(long, default_value = "")]
        major: String,

        #[arg(long, default_value = "")]
        semester: String,

        #[arg(long = "preference")]
        preferences: Vec<String>,

        #[arg(long, default_value = "")]
        interests: String,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let client = ReviewClient::new(&args.server)?;

    match args.command {
        Command::Import { file } => {
            process::import_reviews(&client, &file).await?;
        }
        Command::Reviews { course_code } => process::show_reviews(&client, &course_code).await?,
        Command::Stats { course_code } => process::show_stats(&client, &course_code).await?,
        Command::Recommend {
            major,
            semester,
            preferences,
            interests,
            limit,
        } => {
            let profile = reviews::StudentProfile {
                major,
                semester,
                preferences,
                interests,
                limit,
            };
            process::show_recommendations(&client, &profile).await?
        }
    }

    Ok(())
}
