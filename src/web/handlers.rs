use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use warp::{http::StatusCode, reply::Response, Reply};

use crate::{
    core::{
        analytics::Analytics,
        exchange::{ExchangeRequest, ParticipantQuery},
        export,
        master_data::{Designation, Team},
        participant::{GiftStatus, Participant, Registration},
        roster::PairingState,
    },
    error::Error,
    send_message, Directory,
};

/// A Json struct to store a participant/team/designation ID
#[derive(Serialize, Deserialize, Debug)]
pub struct Id {
    pub id: String,
}

/// A Json struct to store the name of a new team or designation
#[derive(Serialize, Deserialize, Debug)]
pub struct Name {
    pub name: String,
}

/// A Json struct for the login form
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginForm {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by login and registration
#[derive(Serialize, Deserialize, Debug)]
pub struct SessionReply {
    pub token: String,
    pub participant: Participant,
}

/// A Json struct to set one of the caller's gift flags
#[derive(Serialize, Deserialize, Debug)]
pub struct GiftUpdate {
    pub field: GiftStatus,
    pub value: bool,
}

fn error_reply(e: anyhow::Error) -> Response {
    let status = e
        .downcast_ref::<Error>()
        .map_or(StatusCode::INTERNAL_SERVER_ERROR, Error::status);

    if status.is_server_error() {
        log::error!("{:?}", e);
    } else {
        log::warn!("{}", e);
    }

    warp::reply::with_status(e.to_string(), status).into_response()
}

pub fn to_http_none_or_error(result: anyhow::Result<()>) -> Result<Response, Infallible> {
    match result {
        Ok(_) => Ok(warp::reply::with_status("Success".to_string(), StatusCode::OK).into_response()),
        Err(e) => Ok(error_reply(e)),
    }
}

pub fn to_http_output<T: Serialize>(result: anyhow::Result<T>) -> Result<Response, Infallible> {
    match result {
        Ok(data) => Ok(warp::reply::with_status(warp::reply::json(&data), StatusCode::OK).into_response()),
        Err(e) => Ok(error_reply(e)),
    }
}

/// Reply with a CSV attachment named after `kind` and today's date.
pub fn to_csv_output(result: anyhow::Result<String>, kind: &str) -> Result<Response, Infallible> {
    match result {
        Ok(csv) => {
            let file_name = export::file_name(kind, time::OffsetDateTime::now_utc().date());
            let reply = warp::reply::with_header(csv, "Content-Type", "text/csv;charset=utf-8");
            let reply = warp::reply::with_header(
                reply,
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file_name),
            );
            Ok(reply.into_response())
        }
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn login(form: LoginForm, directory: Directory) -> anyhow::Result<SessionReply> {
    let participant = send_message!(directory.exchange_actor, ExchangeRequest, Login, form.email)?;
    let token = directory.sessions.open(participant.id.clone());
    log::info!("{} logged in", participant.full_name);
    Ok(SessionReply { token, participant })
}

pub async fn logout(token: Option<String>, directory: Directory) -> anyhow::Result<()> {
    let id = token
        .and_then(|t| directory.sessions.close(&t))
        .ok_or(Error::NoSession)?;
    log::info!("{} logged out", id);
    Ok(())
}

pub async fn register(registration: Registration, directory: Directory) -> anyhow::Result<SessionReply> {
    let participant = send_message!(directory.exchange_actor, ExchangeRequest, Register, registration)?;
    let token = directory.sessions.open(participant.id.clone());
    Ok(SessionReply { token, participant })
}

pub async fn me(token: Option<String>, directory: Directory) -> anyhow::Result<Participant> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, Me, caller)
}

pub async fn recipient(token: Option<String>, directory: Directory) -> anyhow::Result<Option<Participant>> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, Recipient, caller)
}

pub async fn set_gift_status(
    token: Option<String>,
    update: GiftUpdate,
    directory: Directory,
) -> anyhow::Result<Participant> {
    let caller = directory.caller(token)?;
    send_message!(
        directory.exchange_actor,
        ExchangeRequest,
        SetGiftStatus,
        caller,
        update.field,
        update.value
    )
}

pub async fn teams(directory: Directory) -> anyhow::Result<Vec<Team>> {
    send_message!(directory.exchange_actor, ExchangeRequest, Teams)
}

pub async fn designations(directory: Directory) -> anyhow::Result<Vec<Designation>> {
    send_message!(directory.exchange_actor, ExchangeRequest, Designations)
}

pub async fn add_team(token: Option<String>, team: Name, directory: Directory) -> anyhow::Result<Team> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, AddTeam, caller, team.name)
}

pub async fn delete_team(token: Option<String>, team: Id, directory: Directory) -> anyhow::Result<()> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, DeleteTeam, caller, team.id)
}

pub async fn add_designation(
    token: Option<String>,
    designation: Name,
    directory: Directory,
) -> anyhow::Result<Designation> {
    let caller = directory.caller(token)?;
    send_message!(
        directory.exchange_actor,
        ExchangeRequest,
        AddDesignation,
        caller,
        designation.name
    )
}

pub async fn delete_designation(
    token: Option<String>,
    designation: Id,
    directory: Directory,
) -> anyhow::Result<()> {
    let caller = directory.caller(token)?;
    send_message!(
        directory.exchange_actor,
        ExchangeRequest,
        DeleteDesignation,
        caller,
        designation.id
    )
}

pub async fn list_participants(
    token: Option<String>,
    query: ParticipantQuery,
    directory: Directory,
) -> anyhow::Result<Vec<Participant>> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, ListParticipants, caller, query)
}

pub async fn update_participant(
    token: Option<String>,
    participant: Participant,
    directory: Directory,
) -> anyhow::Result<()> {
    let caller = directory.caller(token)?;
    send_message!(
        directory.exchange_actor,
        ExchangeRequest,
        UpdateParticipant,
        caller,
        participant
    )
}

pub async fn delete_participant(
    token: Option<String>,
    participant: Id,
    directory: Directory,
) -> anyhow::Result<()> {
    let caller = directory.caller(token)?;
    send_message!(
        directory.exchange_actor,
        ExchangeRequest,
        DeleteParticipant,
        caller,
        participant.id
    )
}

pub async fn initiate_pairing(token: Option<String>, directory: Directory) -> anyhow::Result<PairingState> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, InitiatePairing, caller)
}

pub async fn pairing_state(token: Option<String>, directory: Directory) -> anyhow::Result<PairingState> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, PairingState, caller)
}

pub async fn export_participants(token: Option<String>, directory: Directory) -> anyhow::Result<String> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, ExportParticipants, caller)
}

pub async fn export_pairings(token: Option<String>, directory: Directory) -> anyhow::Result<String> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, ExportPairings, caller)
}

pub async fn analytics(token: Option<String>, directory: Directory) -> anyhow::Result<Analytics> {
    let caller = directory.caller(token)?;
    send_message!(directory.exchange_actor, ExchangeRequest, Analytics, caller)
}
