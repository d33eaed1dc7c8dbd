// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the interactive TUI starts. Subcommands cover:
// - courses/students/enrollments: one-shot CRUD against the school API
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --path: Print the config file location

use crate::admin::{perform, Command, Form, Outcome};
use crate::api::{ApiClient, Resource};
use crate::config::{Config, VERSION};
use crate::model::{Course, Enrollment, Student, DISPLAY_DATE};
use crate::validation::today;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// Tavares School administration client
#[derive(Parser)]
#[command(name = "tavares")]
#[command(version = VERSION)]
#[command(about = "Manage courses, students and enrollments of the Tavares School", long_about = None)]
pub struct Cli {
    /// Base URL of the school API (overrides config and TAVARES_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage courses
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Manage students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Manage enrollments
    Enrollments {
        #[command(subcommand)]
        action: EnrollmentAction,
    },
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Subcommand)]
pub enum CourseAction {
    /// List all courses
    List,
    /// Create a course
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Update a course; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a course
    Delete { id: String },
    /// List the students enrolled in a course
    Students { id: String },
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// List all students
    List,
    /// Create a student (must be at least 18)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// YYYY-MM-DD or DD/MM/YYYY
        #[arg(long)]
        birth_date: String,
    },
    /// Update a student; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        birth_date: Option<String>,
    },
    /// Delete a student
    Delete { id: String },
    /// List the courses a student is enrolled in
    Enrollments { id: String },
    /// Enroll a student in a course
    Enroll { student_id: String, course_id: String },
}

#[derive(Subcommand)]
pub enum EnrollmentAction {
    /// List all enrollments
    List,
    /// Create an enrollment from raw ids
    Create {
        #[arg(long)]
        student: String,
        #[arg(long)]
        course: String,
    },
    /// Delete an enrollment by its own id
    Delete { id: String },
    /// Remove the enrollment linking a student and a course
    Remove { student_id: String, course_id: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity commands
// ─────────────────────────────────────────────────────────────────────────────

/// Run a one-shot entity command
pub async fn run_entity(command: Commands, client: &ApiClient, yes: bool) -> Result<()> {
    match command {
        Commands::Courses { action } => run_course(action, client, yes).await,
        Commands::Students { action } => run_student(action, client, yes).await,
        Commands::Enrollments { action } => run_enrollment(action, client, yes).await,
        Commands::Config { .. } => Ok(()),
    }
}

async fn run_course(action: CourseAction, client: &ApiClient, yes: bool) -> Result<()> {
    match action {
        CourseAction::List => {
            let courses = client.list_courses().await.context("Failed to load courses")?;
            print_courses(&courses);
            Ok(())
        }
        CourseAction::Create { name, description } => {
            let form = Form::Course {
                id: None,
                name,
                description,
            };
            submit(client, &form).await
        }
        CourseAction::Update {
            id,
            name,
            description,
        } => {
            let courses = client.list_courses().await.context("Failed to load courses")?;
            let course = courses
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow!("Course {} not found", id))?;
            let mut form = Form::edit_course(course);
            if let Form::Course {
                name: current_name,
                description: current_description,
                ..
            } = &mut form
            {
                if let Some(name) = name {
                    *current_name = name;
                }
                if let Some(description) = description {
                    *current_description = description;
                }
            }
            submit(client, &form).await
        }
        CourseAction::Delete { id } => {
            if !confirm(yes, &format!("Delete course {}?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            execute(
                client,
                Command::Delete {
                    resource: Resource::Course,
                    id,
                },
            )
            .await
        }
        CourseAction::Students { id } => {
            let students = client
                .students_by_course(&id)
                .await
                .context("Failed to load students")?;
            print_students(&students);
            Ok(())
        }
    }
}

async fn run_student(action: StudentAction, client: &ApiClient, yes: bool) -> Result<()> {
    match action {
        StudentAction::List => {
            let students = client.list_students().await.context("Failed to load students")?;
            print_students(&students);
            Ok(())
        }
        StudentAction::Create {
            name,
            email,
            birth_date,
        } => {
            let form = Form::Student {
                id: None,
                name,
                email,
                birth_date,
            };
            submit(client, &form).await
        }
        StudentAction::Update {
            id,
            name,
            email,
            birth_date,
        } => {
            let students = client.list_students().await.context("Failed to load students")?;
            let student = students
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| anyhow!("Student {} not found", id))?;
            let mut form = Form::edit_student(student);
            if let Form::Student {
                name: current_name,
                email: current_email,
                birth_date: current_birth_date,
                ..
            } = &mut form
            {
                if let Some(name) = name {
                    *current_name = name;
                }
                if let Some(email) = email {
                    *current_email = email;
                }
                if let Some(birth_date) = birth_date {
                    *current_birth_date = birth_date;
                }
            }
            submit(client, &form).await
        }
        StudentAction::Delete { id } => {
            if !confirm(yes, &format!("Delete student {}?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            execute(
                client,
                Command::Delete {
                    resource: Resource::Student,
                    id,
                },
            )
            .await
        }
        StudentAction::Enrollments { id } => {
            let enrollments = client
                .enrollments_by_student(&id)
                .await
                .context("Failed to load enrollments")?;
            print_enrollments(&enrollments);
            Ok(())
        }
        StudentAction::Enroll {
            student_id,
            course_id,
        } => {
            let form = Form::Enrollment {
                student_id,
                course_id,
            };
            submit(client, &form).await
        }
    }
}

async fn run_enrollment(action: EnrollmentAction, client: &ApiClient, yes: bool) -> Result<()> {
    match action {
        EnrollmentAction::List => {
            let enrollments = client
                .list_enrollments()
                .await
                .context("Failed to load enrollments")?;
            print_enrollments(&enrollments);
            Ok(())
        }
        EnrollmentAction::Create { student, course } => {
            let form = Form::Enrollment {
                student_id: student,
                course_id: course,
            };
            submit(client, &form).await
        }
        EnrollmentAction::Delete { id } => {
            if !confirm(yes, &format!("Delete enrollment {}?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            execute(
                client,
                Command::Delete {
                    resource: Resource::Enrollment,
                    id,
                },
            )
            .await
        }
        EnrollmentAction::Remove {
            student_id,
            course_id,
        } => {
            let question = format!(
                "Remove the enrollment of student {} in course {}?",
                student_id, course_id
            );
            if !confirm(yes, &question)? {
                println!("Aborted.");
                return Ok(());
            }
            execute(
                client,
                Command::RemoveEnrollment {
                    student_id,
                    course_id,
                },
            )
            .await
        }
    }
}

/// Validate a form and send it; validation failures never reach the network
async fn submit(client: &ApiClient, form: &Form) -> Result<()> {
    let save = form.to_save(today())?;
    execute(client, Command::Save { ticket: 0, save }).await
}

/// Perform a mutation and report it the way the TUI notifies
async fn execute(client: &ApiClient, command: Command) -> Result<()> {
    let (message, result) = match perform(client, command).await {
        Outcome::Saved { kind, result, .. } => match result {
            Ok(()) => (kind.success_message(), Ok(())),
            Err(e) => (kind.failure_message(), Err(e)),
        },
        Outcome::Deleted { result, .. } => match result {
            Ok(()) => ("Record deleted".to_string(), Ok(())),
            Err(e) => ("Failed to delete record".to_string(), Err(e)),
        },
        Outcome::Unenrolled(result) => match result {
            Ok(()) => ("Enrollment removed".to_string(), Ok(())),
            Err(e) => ("Failed to remove enrollment".to_string(), Err(e)),
        },
        Outcome::Loaded { .. } | Outcome::CourseOptions(_) => {
            bail!("Unexpected read result for a mutation")
        }
    };

    result.context(message.clone())?;
    println!("{}", message);
    Ok(())
}

/// Ask `[y/N]` on stderr unless `--yes` was given
fn confirm(yes: bool, question: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{} [y/N] ", question);
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read answer")?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Table output
// ─────────────────────────────────────────────────────────────────────────────

/// Print rows as left-aligned columns sized to their widest cell
fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.width());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.to_vec());
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
}

fn print_courses(courses: &[Course]) {
    let rows: Vec<Vec<String>> = courses
        .iter()
        .map(|c| vec![c.id.clone(), c.name.clone(), c.description.clone()])
        .collect();
    print_table(&["ID", "NAME", "DESCRIPTION"], &rows);
}

fn print_students(students: &[Student]) {
    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.email.clone(),
                s.birth_date.format(DISPLAY_DATE).to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "E-MAIL", "BIRTH DATE"], &rows);
}

fn print_enrollments(enrollments: &[Enrollment]) {
    let rows: Vec<Vec<String>> = enrollments
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                e.student_label(),
                e.course_label(),
                e.enrolled_on().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "STUDENT", "COURSE", "ENROLLED"], &rows);
}

// ─────────────────────────────────────────────────────────────────────────────
// Config commands
// ─────────────────────────────────────────────────────────────────────────────

/// Handle `config` flags
pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else {
        println!("Usage: tavares config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        let question = format!("Config file exists at {}. Overwrite?", path.display());
        match confirm(false, &question) {
            Ok(true) => {}
            Ok(false) => {
                println!("Aborted.");
                return;
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match std::process::Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}
