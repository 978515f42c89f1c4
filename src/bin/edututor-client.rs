use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;

use edututor_server::{
    client::{
        ApiClient, ClassroomClient, ClientError, ClientResult, GoogleOAuthClient, QuizApi,
        QuizSession, DEFAULT_API_URL, DEFAULT_USER_ID,
    },
    models::domain::{quiz_question::option_label, QuizQuestion},
};

#[derive(Parser, Debug)]
#[command(name = "edututor-client", author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the EduTutor backend
    #[arg(long, env = "EDUTUTOR_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// User the attempts are stored under (the login email when signed in)
    #[arg(long, env = "EDUTUTOR_USER_ID", default_value = DEFAULT_USER_ID)]
    user_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a quiz, answer it interactively and submit the result
    Quiz {
        #[arg(long, default_value = "Machine Learning")]
        topic: String,

        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
        num_questions: u8,
    },
    /// Show past attempts
    History,
    /// Sign in with Google. Without a code, prints the consent URL.
    Login {
        #[arg(long)]
        code: Option<String>,
    },
    /// Browse Google Classroom
    Classroom {
        #[arg(long, value_enum, default_value_t = Role::Student)]
        role: Role,

        #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Role {
    Student,
    Educator,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    match cli.command {
        Command::Quiz {
            topic,
            num_questions,
        } => {
            let api = ApiClient::new(&cli.api_url)?;
            take_quiz(&api, &cli.user_id, &topic, num_questions as usize).await
        }
        Command::History => {
            let api = ApiClient::new(&cli.api_url)?;
            show_history(&api, &cli.user_id).await
        }
        Command::Login { code } => login(code).await,
        Command::Classroom { role, access_token } => {
            let classroom = ClassroomClient::new(SecretString::from(access_token));
            show_classroom(&classroom, role).await
        }
    }
}

async fn take_quiz(
    api: &dyn QuizApi,
    user_id: &str,
    topic: &str,
    num_questions: usize,
) -> ClientResult<()> {
    let mut session = QuizSession::new(user_id);
    println!("Generating quiz...");
    session.generate(api, topic, num_questions).await?;
    println!("Quiz on {}", session.topic());

    let stdin = io::stdin();
    let questions: Vec<QuizQuestion> = session.questions().to_vec();
    for (index, question) in questions.iter().enumerate() {
        println!();
        println!("Q{}: {}", index + 1, question.question);
        for option in &question.options {
            println!("  {}", option);
        }

        loop {
            print!("Your answer: ");
            io::stdout().flush().ok();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
                return Err(ClientError::Session("Input closed before the quiz was finished".to_string()));
            }

            match choose_option(question, line.trim()) {
                Some(option) => {
                    session.select(index, &option)?;
                    break;
                }
                None => println!("Pick one of the listed options by its letter."),
            }
        }
    }

    let outcome = session.submit(api).await?;
    println!();
    println!("Your Score: {}/{}", outcome.score, outcome.total);
    match outcome.warning {
        Some(warning) => println!("{}", warning),
        None => println!("Quiz data stored."),
    }

    println!();
    println!("Review");
    for item in outcome.review {
        println!("Q{}: {}", item.number, item.question);
        println!("- Your Answer: {}", item.chosen);
        println!("- Correct Answer: {}", item.correct_answer);
        println!("- {}", if item.is_correct { "Correct" } else { "Incorrect" });
    }
    Ok(())
}

/// Matches input against an option's label ("b") or its full text.
fn choose_option(question: &QuizQuestion, input: &str) -> Option<String> {
    question
        .options
        .iter()
        .find(|option| option_label(option).eq_ignore_ascii_case(input) || option.as_str() == input)
        .cloned()
}

async fn show_history(api: &dyn QuizApi, user_id: &str) -> ClientResult<()> {
    let history = api.quiz_history(user_id).await?;
    if history.is_empty() {
        println!("No quiz history found.");
        return Ok(());
    }

    println!("Found {} past quiz attempts.", history.len());
    for (index, attempt) in history.iter().enumerate() {
        println!();
        println!("Attempt {} - {}", index + 1, attempt.timestamp);
        println!("Topic: {}", attempt.topic);
        println!("Score: {}", attempt.score);
        for (number, (question, answer)) in attempt.questions.iter().zip(&attempt.answers).enumerate() {
            println!("Q{}: {}", number + 1, question);
            println!("- Your Answer: {}", answer);
        }
    }
    Ok(())
}

async fn login(code: Option<String>) -> ClientResult<()> {
    let oauth = GoogleOAuthClient::from_env()?;
    match code {
        None => {
            let (url, state) = oauth.authorization_url()?;
            println!("Open this URL to log in with Google:");
            println!("{}", url);
            println!("state: {}", state);
            println!("Then run `edututor-client login --code <code>` with the returned code.");
        }
        Some(code) => {
            let result = oauth.login(&code).await?;
            println!("Logged in as {}", result.email);
            println!("Export EDUTUTOR_USER_ID={} and GOOGLE_ACCESS_TOKEN to reuse this login.", result.email);
        }
    }
    Ok(())
}

async fn show_classroom(classroom: &ClassroomClient, role: Role) -> ClientResult<()> {
    match role {
        Role::Student => {
            let courses = classroom.student_view().await?;
            if courses.is_empty() {
                println!("No courses found.");
            }
            for entry in courses {
                println!("{} ({})", entry.course.name, entry.course.id);
                if entry.materials.is_empty() {
                    println!("  No materials found.");
                }
                for title in entry.materials {
                    println!("  - {}", title);
                }
            }
        }
        Role::Educator => {
            let courses = classroom.educator_view().await?;
            if courses.is_empty() {
                println!("No courses found.");
            }
            for entry in courses {
                println!("{} ({})", entry.course.name, entry.course.id);
                if entry.students.is_empty() {
                    println!("  No enrolled students.");
                }
                for student in entry.students {
                    println!("  - {} ({})", student.full_name, student.email);
                }
            }
        }
    }
    Ok(())
}
