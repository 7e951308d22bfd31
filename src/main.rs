//! charla — a terminal client for a realtime chat relay.
//!
//! Two halves, mirroring the two pages of the app this replaces: a room
//! book of saved name/code pairs managed offline, and a live room session
//! over a websocket to the relay. All local state lives in a handful of
//! files under the platform data directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod identity;
mod media;
mod relay;
mod rooms;
mod session;
mod store;

use rooms::RoomBook;
use store::StatePaths;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] store::StoreError),
    #[error(transparent)]
    Rooms(#[from] rooms::RoomBookError),
    #[error(transparent)]
    Session(#[from] session::SessionError),
}

#[derive(Parser, Debug)]
#[command(name = "charla", about = "Terminal client for a realtime chat relay")]
struct Cli {
    /// Relay endpoint; http(s) URLs are rewritten to ws(s).
    #[arg(
        long,
        env = "CHARLA_RELAY_URL",
        default_value = "http://127.0.0.1:3001",
        global = true
    )]
    relay_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the saved room list.
    Rooms(RoomsCommand),

    /// Print this installation's client identifier.
    Whoami,

    /// Join a room and chat interactively.
    Chat {
        /// Saved room code, saved room name, or a verbatim code.
        room: String,
    },

    /// Send a single message to a room and exit.
    Send {
        /// Saved room code, saved room name, or a verbatim code.
        room: String,
        /// Message text; may be omitted when media is attached.
        message: Option<String>,
        /// Attach an image file.
        #[arg(long)]
        image: Option<PathBuf>,
        /// Attach an audio file.
        #[arg(long)]
        audio: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RoomsCommand {
    #[command(subcommand)]
    command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RoomsSubcommand {
    /// List saved rooms in the order they were added.
    List,
    /// Save a room; a code is generated when none is given.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: Option<String>,
    },
    /// Delete the saved room with this code.
    Remove { code: String },
    /// Print a fresh room code without saving anything.
    Code,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Chat output owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = StatePaths::resolve()?;

    match cli.command {
        Command::Rooms(rooms) => run_rooms(&paths, rooms),
        Command::Whoami => {
            let id = identity::client_id(&paths)?;
            println!("{id}");
            Ok(())
        }
        Command::Chat { room } => {
            let book = RoomBook::load(&paths)?;
            let code = book.resolve(&room);
            let user = identity::client_id(&paths)?;
            session::run(&cli.relay_url, &code, &user, &paths.media_dir()).await?;
            Ok(())
        }
        Command::Send {
            room,
            message,
            image,
            audio,
        } => {
            let book = RoomBook::load(&paths)?;
            let code = book.resolve(&room);
            let user = identity::client_id(&paths)?;
            session::send_once(
                &cli.relay_url,
                &code,
                &user,
                message.as_deref().unwrap_or(""),
                image.as_deref(),
                audio.as_deref(),
            )
            .await?;
            Ok(())
        }
    }
}

fn run_rooms(paths: &StatePaths, rooms: RoomsCommand) -> Result<(), CliError> {
    match rooms.command {
        RoomsSubcommand::List => {
            let book = RoomBook::load(paths)?;
            if book.rooms().is_empty() {
                println!("no saved rooms yet; add one with `charla rooms add --name <name>`");
                return Ok(());
            }
            for room in book.rooms() {
                println!("{}\t{}", room.name, room.code);
            }
            Ok(())
        }
        RoomsSubcommand::Add { name, code } => {
            let mut book = RoomBook::load(paths)?;
            let code = code.unwrap_or_else(rooms::generate_code);
            let room = book.add(&name, &code)?;
            println!("saved room `{}` with code {}", room.name, room.code);
            Ok(())
        }
        RoomsSubcommand::Remove { code } => {
            let mut book = RoomBook::load(paths)?;
            let room = book.remove(&code)?;
            println!("removed room `{}`", room.name);
            Ok(())
        }
        RoomsSubcommand::Code => {
            println!("{}", rooms::generate_code());
            Ok(())
        }
    }
}
