use interview_chat::adapters::ReqwestHttpClient;
use interview_chat::config::ChatConfig;
use interview_chat::conversation::Conversation;
use interview_chat::models::InterviewMode;
use interview_chat::session::{ChatSession, ExchangeOutcome, OPENING_PROMPT};

use color_eyre::Result;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: /mode <technical|behavioral|general>, /reset, /quit";

/// Prints assistant text as it streams in.
///
/// Remembers how many turns and bytes have been written so each snapshot
/// only prints what is new. A shrinking conversation means it was reset.
#[derive(Default)]
struct TranscriptPrinter {
    seen: usize,
    streamed: usize,
}

impl TranscriptPrinter {
    fn render(&mut self, conversation: &Conversation, out: &mut impl Write) -> std::io::Result<()> {
        let messages = conversation.messages();
        if messages.len() < self.seen {
            self.seen = 0;
            self.streamed = 0;
        }

        if let Some(open) = self.seen.checked_sub(1).map(|i| &messages[i]) {
            if open.is_assistant() {
                if let Some(rest) = open.content.get(self.streamed..) {
                    write!(out, "{}", rest)?;
                }
            }
            self.streamed = open.content.len();
        }

        for message in &messages[self.seen..] {
            if message.is_assistant() {
                write!(out, "\ninterviewer> {}", message.content)?;
            }
            self.streamed = message.content.len();
        }
        self.seen = messages.len();
        out.flush()
    }
}

/// What the prompt produced.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    Eof,
    /// Ctrl-C while no exchange was running
    Interrupted,
}

/// Read the next prompt line, giving up when `interrupt` fires first.
///
/// Once a Ctrl-C handler is registered SIGINT no longer ends the process,
/// so the idle prompt has to listen for it too.
async fn read_input<R>(
    lines: &mut Lines<R>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> std::io::Result<Input>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = lines.next_line() => Ok(line?.map_or(Input::Eof, Input::Line)),
        signal = interrupt => {
            signal?;
            Ok(Input::Interrupted)
        }
    }
}

/// Send one turn, printing the reply as it streams. Ctrl-C cancels it.
async fn exchange(
    session: &ChatSession<ReqwestHttpClient>,
    rx: &mut watch::Receiver<Conversation>,
    printer: &mut TranscriptPrinter,
    text: String,
) -> Result<()> {
    let send = session.send_message(text);
    tokio::pin!(send);

    loop {
        tokio::select! {
            outcome = &mut send => {
                if let ExchangeOutcome::Failed(e) = outcome {
                    tracing::debug!("Exchange failed: {}", e);
                }
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                printer.render(&snapshot, &mut std::io::stdout())?;
            }
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                println!("\n(cancelled)");
            }
        }
    }

    let snapshot = rx.borrow_and_update().clone();
    printer.render(&snapshot, &mut std::io::stdout())?;
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from_env()?;
    tracing::debug!("Loaded config: {:?}", config);

    let session = ChatSession::new(ReqwestHttpClient::new(), config);
    let mut rx = session.subscribe();
    let mut printer = TranscriptPrinter::default();

    println!("{} interview. {}", session.mode(), HELP);
    exchange(&session, &mut rx, &mut printer, OPENING_PROMPT.to_string()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nyou> ");
        std::io::stdout().flush()?;

        let line = match read_input(&mut lines, tokio::signal::ctrl_c()).await? {
            Input::Line(line) => line,
            Input::Eof => break,
            Input::Interrupted => {
                println!();
                break;
            }
        };
        let line = line.trim();

        match line
            .split_once(' ')
            .map_or((line, ""), |(cmd, arg)| (cmd, arg.trim()))
        {
            ("/quit", _) => break,
            ("/reset", _) => {
                session.reset();
                exchange(&session, &mut rx, &mut printer, OPENING_PROMPT.to_string()).await?;
            }
            ("/mode", arg) => match arg.parse::<InterviewMode>() {
                Ok(mode) => {
                    session.set_mode(mode);
                    println!("Mode set to {}. Use /reset to restart the interview.", mode);
                }
                Err(e) => println!("{}", e),
            },
            ("/help", _) => println!("{}", HELP),
            ("", _) => {}
            _ => exchange(&session, &mut rx, &mut printer, line.to_string()).await?,
        }
    }

    session.end_interview();
    Ok(())
}
