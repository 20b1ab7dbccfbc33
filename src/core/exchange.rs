use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{error::Error, ActorRef, Rto};

use super::{
    analytics::{self, Analytics},
    export,
    master_data::{Designation, Team},
    pairing::{generate_pairings, is_valid_cycle},
    participant::{GiftStatus, Participant, ParticipantId, Registration},
    roster::{PairingState, RosterStore},
    validation,
};

/// Column to order the admin participant list by
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Email,
    Team,
    Designation,
}

/// Search and sort options for the admin participant list
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantQuery {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

/// Requests that can be sent to an ExchangeActor.
///
/// Admin requests carry the caller's ID first.
pub enum ExchangeRequest {
    Login(String, Rto<Participant>),
    Register(Registration, Rto<Participant>),
    Me(ParticipantId, Rto<Participant>),
    Recipient(ParticipantId, Rto<Option<Participant>>),
    SetGiftStatus(ParticipantId, GiftStatus, bool, Rto<Participant>),
    Teams(Rto<Vec<Team>>),
    Designations(Rto<Vec<Designation>>),
    ListParticipants(ParticipantId, ParticipantQuery, Rto<Vec<Participant>>),
    UpdateParticipant(ParticipantId, Participant, Rto<()>),
    DeleteParticipant(ParticipantId, ParticipantId, Rto<()>),
    AddTeam(ParticipantId, String, Rto<Team>),
    DeleteTeam(ParticipantId, String, Rto<()>),
    AddDesignation(ParticipantId, String, Rto<Designation>),
    DeleteDesignation(ParticipantId, String, Rto<()>),
    InitiatePairing(ParticipantId, Rto<PairingState>),
    PairingState(ParticipantId, Rto<PairingState>),
    ExportParticipants(ParticipantId, Rto<String>),
    ExportPairings(ParticipantId, Rto<String>),
    Analytics(ParticipantId, Rto<Analytics>),
}

pub type ExchangeActor = ActorRef<ExchangeRequest>;

/// The gift exchange: the roster plus the workflow rules around it.
pub struct Exchange {
    store: RosterStore,
    rng: StdRng,
    min_password_length: usize,
}

impl Exchange {
    pub fn new(store: RosterStore, rng: StdRng, min_password_length: usize) -> Self {
        Exchange {
            store,
            rng,
            min_password_length,
        }
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    /// The logged in participant, or NoSession if they no longer exist.
    fn caller(&self, id: &str) -> anyhow::Result<&Participant> {
        self.store.participant(id).ok_or_else(|| Error::NoSession.into())
    }

    fn require_admin(&self, id: &str) -> anyhow::Result<()> {
        let caller = self.caller(id)?;
        if caller.is_admin {
            Ok(())
        } else {
            log::warn!("Rejected admin request from {} ({})", caller.full_name, caller.id);
            Err(Error::Forbidden(caller.id.clone()))?
        }
    }

    /// Look a participant up by email. Passwords are not checked.
    pub fn login(&self, email: &str) -> anyhow::Result<Participant> {
        log::debug!("Login attempt for {}", email);
        self.store
            .find_by_email(email)
            .cloned()
            .ok_or_else(|| Error::UnknownEmail(email.to_owned()).into())
    }

    pub fn register(&mut self, registration: Registration) -> anyhow::Result<Participant> {
        validation::validate_registration(
            &registration,
            self.store.participants(),
            self.min_password_length,
        )?;
        Ok(self.store.add_participant(registration))
    }

    pub fn me(&self, id: &str) -> anyhow::Result<Participant> {
        self.caller(id).cloned()
    }

    pub fn recipient(&self, id: &str) -> anyhow::Result<Option<Participant>> {
        self.caller(id)?;
        Ok(self.store.recipient_for(id).cloned())
    }

    pub fn set_gift_status(
        &mut self,
        id: &str,
        status: GiftStatus,
        value: bool,
    ) -> anyhow::Result<Participant> {
        self.caller(id)?;
        self.store.set_gift_status(id, status, value);
        log::info!("Participant {} set {:?} to {}", id, status, value);
        self.me(id)
    }

    pub fn list_participants(
        &self,
        caller: &str,
        query: &ParticipantQuery,
    ) -> anyhow::Result<Vec<Participant>> {
        self.require_admin(caller)?;

        let mut participants: Vec<Participant> = self
            .store
            .participants()
            .iter()
            .filter(|p| query.search.as_deref().map_or(true, |term| p.matches(term)))
            .cloned()
            .collect();

        if let Some(key) = query.sort {
            participants.sort_by_cached_key(|p| {
                let field = match key {
                    SortKey::Name => &p.full_name,
                    SortKey::Email => &p.email,
                    SortKey::Team => &p.team,
                    SortKey::Designation => &p.designation,
                };
                field.to_lowercase()
            });
        }

        Ok(participants)
    }

    pub fn update_participant(&mut self, caller: &str, participant: Participant) -> anyhow::Result<()> {
        self.require_admin(caller)?;
        validation::validate_participant(&participant)?;

        let id = participant.id.clone();
        if self.store.update_participant(participant) {
            Ok(())
        } else {
            Err(Error::UnknownParticipant(id))?
        }
    }

    pub fn delete_participant(&mut self, caller: &str, id: &str) -> anyhow::Result<()> {
        self.require_admin(caller)?;
        self.store
            .delete_participant(id)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownParticipant(id.to_owned()).into())
    }

    pub fn add_team(&mut self, caller: &str, name: &str) -> anyhow::Result<Team> {
        self.require_admin(caller)?;
        let name = validation::validate_team_name(name, self.store.teams())?;
        Ok(self.store.add_team(&name))
    }

    pub fn delete_team(&mut self, caller: &str, id: &str) -> anyhow::Result<()> {
        self.require_admin(caller)?;
        self.store
            .delete_team(id)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownTeam(id.to_owned()).into())
    }

    pub fn add_designation(&mut self, caller: &str, name: &str) -> anyhow::Result<Designation> {
        self.require_admin(caller)?;
        let name = validation::validate_designation_name(name, self.store.designations())?;
        Ok(self.store.add_designation(&name))
    }

    pub fn delete_designation(&mut self, caller: &str, id: &str) -> anyhow::Result<()> {
        self.require_admin(caller)?;
        self.store
            .delete_designation(id)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownDesignation(id.to_owned()).into())
    }

    /// Draw a new gift cycle over every current participant, replacing any
    /// previous draw. Also serves as reshuffle.
    pub fn initiate_pairing(&mut self, caller: &str) -> anyhow::Result<PairingState> {
        self.require_admin(caller)?;

        let ids = self.store.participant_ids();
        if ids.len() < 2 {
            log::warn!("Refusing to pair {} participant(s)", ids.len());
            Err(Error::NotEnoughParticipants(ids.len()))?
        }

        let pairings = generate_pairings(&ids, &mut self.rng);
        if !is_valid_cycle(&ids, &pairings) {
            log::error!("Generated pairings do not form a valid cycle: {:?}", pairings);
        }

        let reshuffle = self.store.pairing_state().complete;
        self.store.replace_pairings(pairings);
        log::info!(
            "{} pairings for {} participants",
            if reshuffle { "Reshuffled" } else { "Generated" },
            ids.len()
        );

        Ok(self.store.pairing_state().clone())
    }

    pub fn pairing_state(&self, caller: &str) -> anyhow::Result<PairingState> {
        self.require_admin(caller)?;
        Ok(self.store.pairing_state().clone())
    }

    pub fn export_participants(&self, caller: &str) -> anyhow::Result<String> {
        self.require_admin(caller)?;
        Ok(export::participants_csv(self.store.participants()))
    }

    pub fn export_pairings(&self, caller: &str) -> anyhow::Result<String> {
        self.require_admin(caller)?;
        Ok(export::pairings_csv(
            &self.store.pairing_state().pairings,
            self.store.participants(),
        ))
    }

    pub fn analytics(&self, caller: &str) -> anyhow::Result<Analytics> {
        self.require_admin(caller)?;
        Ok(analytics::compute(
            self.store.participants(),
            self.store.teams(),
            self.store.designations(),
        ))
    }
}

/// Serves requests one at a time, so every change to the roster (in
/// particular a new draw) is applied whole before the next request is seen.
pub async fn run_exchange_actor(
    mut exchange: Exchange,
    mut rx: UnboundedReceiver<ExchangeRequest>,
) -> anyhow::Result<()> {
    log::debug!("Started exchange actor");
    while let Some(msg) = rx.recv().await {
        match msg {
            ExchangeRequest::Login(email, rto) => rto.reply(exchange.login(&email)),
            ExchangeRequest::Register(registration, rto) => rto.reply(exchange.register(registration)),
            ExchangeRequest::Me(id, rto) => rto.reply(exchange.me(&id)),
            ExchangeRequest::Recipient(id, rto) => rto.reply(exchange.recipient(&id)),
            ExchangeRequest::SetGiftStatus(id, status, value, rto) => {
                rto.reply(exchange.set_gift_status(&id, status, value))
            }
            ExchangeRequest::Teams(rto) => rto.reply(Ok(exchange.store().teams().to_vec())),
            ExchangeRequest::Designations(rto) => {
                rto.reply(Ok(exchange.store().designations().to_vec()))
            }
            ExchangeRequest::ListParticipants(caller, query, rto) => {
                rto.reply(exchange.list_participants(&caller, &query))
            }
            ExchangeRequest::UpdateParticipant(caller, participant, rto) => {
                rto.reply(exchange.update_participant(&caller, participant))
            }
            ExchangeRequest::DeleteParticipant(caller, id, rto) => {
                rto.reply(exchange.delete_participant(&caller, &id))
            }
            ExchangeRequest::AddTeam(caller, name, rto) => rto.reply(exchange.add_team(&caller, &name)),
            ExchangeRequest::DeleteTeam(caller, id, rto) => rto.reply(exchange.delete_team(&caller, &id)),
            ExchangeRequest::AddDesignation(caller, name, rto) => {
                rto.reply(exchange.add_designation(&caller, &name))
            }
            ExchangeRequest::DeleteDesignation(caller, id, rto) => {
                rto.reply(exchange.delete_designation(&caller, &id))
            }
            ExchangeRequest::InitiatePairing(caller, rto) => rto.reply(exchange.initiate_pairing(&caller)),
            ExchangeRequest::PairingState(caller, rto) => rto.reply(exchange.pairing_state(&caller)),
            ExchangeRequest::ExportParticipants(caller, rto) => {
                rto.reply(exchange.export_participants(&caller))
            }
            ExchangeRequest::ExportPairings(caller, rto) => rto.reply(exchange.export_pairings(&caller)),
            ExchangeRequest::Analytics(caller, rto) => rto.reply(exchange.analytics(&caller)),
        }
    }

    log::debug!("Exchange actor stopped");
    Ok(())
}
