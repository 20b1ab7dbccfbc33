use std::{path::PathBuf, sync::Arc};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        oneshot,
    },
    task::JoinSet,
};

use crate::{
    core::{
        exchange::{run_exchange_actor, Exchange, ExchangeActor},
        export::pairings_csv,
        pairing::generate_pairings,
        participant::ParticipantId,
        roster::RosterStore,
        session::Sessions,
        settings::Settings,
    },
    error::Error,
};

mod core;
mod error;
mod web;

#[derive(Parser, Debug)]
#[command(name = "SecretSanta")]
#[command(version = "0.1")]
#[command(about = "A Secret Santa gift exchange manager.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: RunType,
}

#[derive(Subcommand, Debug)]
enum RunType {
    /// Run the HTTP API.
    /// All data lives in memory and is lost when the process exits.
    Serve {
        /// Location of a JSON settings file.
        /// Defaults are used for any missing field, or for all of them if omitted.
        #[arg(short, long)]
        settings_file: Option<PathBuf>,
    },

    /// Draw pairings for the demo roster and print them as CSV.
    Pair {
        /// Seed for a reproducible draw.
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// A handle used to send requests to an actor task.
pub struct ActorRef<T> {
    tx: UnboundedSender<T>,
}

impl<T> Clone for ActorRef<T> {
    fn clone(&self) -> Self {
        ActorRef {
            tx: self.tx.clone(),
        }
    }
}

impl<T> ActorRef<T> {
    /// Create a handle along with the receiver the actor task should own.
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ActorRef { tx }, rx)
    }

    pub fn send(&self, msg: T) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow!("Actor is no longer running"))
    }
}

/// Reply-to handle passed along with each actor request.
pub struct Rto<T> {
    tx: oneshot::Sender<anyhow::Result<T>>,
}

impl<T> Rto<T> {
    pub fn new() -> (Self, oneshot::Receiver<anyhow::Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Rto { tx }, rx)
    }

    pub fn reply(self, value: anyhow::Result<T>) {
        if self.tx.send(value).is_err() {
            log::debug!("Requester went away before the reply was sent");
        }
    }
}

/// Send a request to an actor and await its reply.
///
/// `send_message!(actor, Request, Variant, args...)` builds
/// `Request::Variant(args..., rto)` and evaluates to the `anyhow::Result` sent back.
#[macro_export]
macro_rules! send_message {
    ($actor:expr, $request:ident, $variant:ident $(, $arg:expr)* $(,)?) => {{
        let (rto, rx) = $crate::Rto::new();
        match $actor.send($request::$variant($($arg,)* rto)) {
            Ok(()) => match rx.await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("Actor dropped the request")),
            },
            Err(e) => Err(e),
        }
    }};
}

/// Handles to every running actor, shared with the web layer.
#[derive(Clone)]
pub struct Directory {
    pub exchange_actor: ExchangeActor,
    pub sessions: Arc<Sessions>,
}

impl Directory {
    /// Resolve a session token to the participant who owns it.
    pub fn caller(&self, token: Option<String>) -> anyhow::Result<ParticipantId> {
        Ok(token
            .and_then(|t| self.sessions.resolve(&t))
            .ok_or(Error::NoSession)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        RunType::Serve { settings_file } => {
            let settings = Arc::new(Settings::load(settings_file.as_deref())?);

            let store = if settings.seed_demo_data() {
                log::info!("Starting with the demo roster");
                RosterStore::seeded()
            } else {
                RosterStore::new()
            };

            let (exchange_actor, rx) = ExchangeActor::new();
            let exchange = Exchange::new(store, StdRng::from_entropy(), settings.min_password_length());

            let directory = Directory {
                exchange_actor,
                sessions: Arc::new(Sessions::new()),
            };

            let mut tasks = JoinSet::new();
            tasks.spawn(run_exchange_actor(exchange, rx));
            tasks.spawn(web::run_http_server(directory, settings.clone()));

            while let Some(res) = tasks.join_next().await {
                res??;
            }

            Ok(())
        }
        RunType::Pair { seed } => {
            let store = RosterStore::seeded();
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let pairings = generate_pairings(&store.participant_ids(), &mut rng);
            println!("{}", pairings_csv(&pairings, store.participants()));

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange::ExchangeRequest;

    #[tokio::test]
    async fn test_send_to_stopped_actor() {
        let (actor, rx) = ExchangeActor::new();
        drop(rx);

        let result = send_message!(actor, ExchangeRequest, Teams);
        assert!(result.is_err());
    }

    #[test]
    fn test_caller() {
        let (exchange_actor, _rx) = ExchangeActor::new();
        let directory = Directory {
            exchange_actor,
            sessions: Arc::new(Sessions::new()),
        };
        let token = directory.sessions.open("5".to_owned());

        assert_eq!(directory.caller(Some(token)).unwrap(), "5");
        assert!(directory.caller(Some("bogus".to_owned())).is_err());
        assert!(directory.caller(None).is_err());
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["secret-santa", "pair", "--seed", "4"]);
        assert!(matches!(args.command, RunType::Pair { seed: Some(4) }));

        let args = Args::parse_from(["secret-santa", "serve"]);
        assert!(matches!(args.command, RunType::Serve { settings_file: None }));
    }
}
