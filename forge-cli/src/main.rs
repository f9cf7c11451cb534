use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::LevelFilter;

use forge::auth;
use forge::config::Config;
use forge::db;
use forge::db::models::Role;
use forge::draft::{MesocycleForm, PlanMode};
use forge::generator::{DayPlan, bundled_templates, parse_weekday, weekday_name};
use forge::session::Session;

#[derive(Parser, Debug)]
#[command(version, about = "Forge - training block planner CLI", long_about = None)]
struct Args {
    /// Database file, overrides FORGE_DB_PATH / DATABASE_URL
    #[arg(long, global = true)]
    db: Option<String>,
    #[arg(long, env = "FORGE_EMAIL", global = true)]
    email: Option<String>,
    #[arg(long, env = "FORGE_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
    /// Repeat for more output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        admin: bool,
    },
    /// List catalog exercises
    Exercises {
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Manage mesocycles
    Meso {
        #[command(subcommand)]
        command: MesoCommand,
    },
    /// Show the workout days of a mesocycle (the active one by default)
    Days { meso_id: Option<String> },
    /// Show progress: set volume and records, or the 1RM trend of one exercise
    Progress {
        #[arg(short, long)]
        exercise: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum MesoCommand {
    List,
    /// Create a mesocycle from a preset template or from explicit days
    Create {
        name: String,
        #[arg(short, long, default_value_t = 4)]
        weeks: i64,
        /// First training weekday
        #[arg(long, default_value = "Monday")]
        start_day: String,
        /// Start date (YYYY-MM-DD); defaults to the next start day
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Preset template name
        #[arg(short, long, conflicts_with = "day")]
        preset: Option<String>,
        /// Custom day as WEEKDAY=exercise-id,exercise-id (repeatable)
        #[arg(short, long)]
        day: Vec<String>,
    },
    Activate { id: String },
    Delete { id: String },
    /// Suggest a free name based on NAME
    Suggest { name: String },
    /// List the preset templates
    Templates,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("forge", level)
        .parse_default_env()
        .init();
}

fn credentials(args: &Args) -> Result<(String, String)> {
    let email = args
        .email
        .clone()
        .ok_or_else(|| anyhow!("--email or FORGE_EMAIL is required"))?;
    let password = args
        .password
        .clone()
        .ok_or_else(|| anyhow!("--password or FORGE_PASSWORD is required"))?;
    Ok((email, password))
}

fn parse_custom_day(raw: &str) -> Result<DayPlan> {
    let (day, exercises) = raw.split_once('=').unwrap_or((raw, ""));
    let weekday = parse_weekday(day).ok_or_else(|| anyhow!("{} is not a weekday", day))?;
    Ok(DayPlan {
        day_name: weekday_name(weekday).to_string(),
        enabled: true,
        muscle_groups: Vec::new(),
        exercise_ids: exercises
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

async fn active_or(session: &Session, meso_id: Option<String>) -> Result<String> {
    match meso_id {
        Some(id) => Ok(id),
        None => session
            .get_active_mesocycle()
            .await?
            .map(|m| m.id)
            .ok_or_else(|| anyhow!("No active mesocycle")),
    }
}

async fn run_meso(session: &Session, command: MesoCommand) -> Result<()> {
    match command {
        MesoCommand::List => {
            for meso in session.list_mesocycles().await? {
                println!(
                    "{} {}  {} ({} weeks from {})",
                    if meso.is_active { "*" } else { " " },
                    meso.id,
                    meso.name,
                    meso.duration_weeks,
                    meso.start_date
                );
            }
        }
        MesoCommand::Create {
            name,
            weeks,
            start_day,
            start_date,
            preset,
            day,
        } => {
            let start_day =
                parse_weekday(&start_day).ok_or_else(|| anyhow!("{} is not a weekday", start_day))?;
            let groups = session.get_muscle_groups().await?.into_iter().collect();
            let mut form = MesocycleForm::new(groups);
            form.name = name;
            form.duration_weeks = weeks;
            form.start_date = start_date;
            form.planner.set_start_day(start_day);
            if day.is_empty() {
                if let Some(template) = preset {
                    form.mode = PlanMode::Preset { template };
                }
            } else {
                form.mode = PlanMode::Custom;
                form.planner.days = day
                    .iter()
                    .map(|d| parse_custom_day(d))
                    .collect::<Result<_>>()?;
            }

            let created = session
                .create_mesocycle_from_form(&form, Local::now().date_naive())
                .await?;
            println!(
                "Created {} ({}) with {} workout days",
                created.mesocycle.name,
                created.mesocycle.id,
                created.days.len()
            );
        }
        MesoCommand::Activate { id } => {
            session.set_active_mesocycle(&id).await?;
            println!("Activated {}", id);
        }
        MesoCommand::Delete { id } => {
            session.delete_mesocycle(&id).await?;
            println!("Deleted {}", id);
        }
        MesoCommand::Suggest { name } => {
            println!("{}", session.suggest_mesocycle_name(&name).await?);
        }
        MesoCommand::Templates => {
            for template in bundled_templates() {
                println!("{}", template.name);
                for day in template.days {
                    println!("\t{}: {}", day.label, day.muscle_groups.join(", "));
                }
            }
        }
    }
    Ok(())
}

async fn run_session_command(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Exercises { group, verbose } => {
            let exercises = match group {
                Some(group) => session.get_exercises_by_muscle_group(&group).await?,
                None => session.list_exercises().await?,
            };
            for exercise in exercises {
                println!(
                    "{}, {} [{}]",
                    exercise.id, exercise.name, exercise.primary_muscle_group
                );
                if verbose {
                    println!(
                        "\t{} | targets: {}",
                        exercise.equipment,
                        exercise.target_muscles.unwrap_or_default().join(", ")
                    );
                }
            }
        }
        Commands::Meso { command } => run_meso(session, command).await?,
        Commands::Days { meso_id } => {
            let meso_id = active_or(session, meso_id).await?;
            for day in session.get_workout_days(&meso_id).await? {
                println!(
                    "{} {} ({}): {}",
                    day.day_of_week,
                    day.day_name,
                    day.id,
                    day.exercise_ids.join(", ")
                );
            }
        }
        Commands::Progress { exercise } => match exercise {
            Some(exercise_id) => {
                for week in session.weekly_one_rep_max(&exercise_id).await {
                    println!("{}: {:.1}", week.week_start, week.one_rep_max);
                }
            }
            None => {
                println!("Average weekly sets");
                for (group, sets) in session.average_sets_by_muscle_group().await {
                    println!("\t{}: {:.1}", group, sets);
                }
                println!("Personal records");
                for record in session.personal_records().await {
                    println!(
                        "\t{}: {:.1} x {} on {}",
                        record.exercise_name, record.weight, record.reps, record.achieved_on
                    );
                }
            }
        },
        Commands::Signup { .. } => bail!("signup does not need a session"),
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::from_env();
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }

    let (email, password) = credentials(&args)?;
    match args.command {
        Commands::Signup { name, admin } => {
            let pool = db::open_pool(&config.db_path)
                .await
                .with_context(|| format!("opening {}", config.db_path))?;
            let role = if admin { Role::Admin } else { Role::User };
            let user = auth::signup_with_role(&pool, &email, &password, &name, role).await?;
            println!("Created account {} for {}", user.id, user.email);
            Ok(())
        }
        command => {
            let session = Session::login(config, &email, &password).await?;
            run_session_command(&session, command).await
        }
    }
}
