use std::convert::Infallible;

use warp::{reject::Rejection, Filter};

use crate::{
    core::{exchange::ParticipantQuery, participant::Participant, participant::Registration},
    Directory,
};

use super::handlers::{
    self, to_csv_output, to_http_none_or_error, to_http_output, GiftUpdate, Id, LoginForm, Name,
};

/// Header carrying the token returned by login or registration
pub const SESSION_HEADER: &str = "x-session-token";

pub fn with_directory(
    directory: Directory,
) -> impl Filter<Extract = (Directory,), Error = Infallible> + Clone {
    warp::any().map(move || directory.clone())
}

fn with_session() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>(SESSION_HEADER)
}

fn session_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let login = warp::path!("login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_directory(directory.clone()))
        .and_then(|form: LoginForm, directory: Directory| async move {
            to_http_output(handlers::login(form, directory).await)
        });

    let logout = warp::path!("logout")
        .and(warp::post())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_none_or_error(handlers::logout(token, directory).await)
        });

    let register = warp::path!("register")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_directory(directory))
        .and_then(|registration: Registration, directory: Directory| async move {
            to_http_output(handlers::register(registration, directory).await)
        });

    login.or(logout).or(register)
}

fn me_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let me = warp::path!("me")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_output(handlers::me(token, directory).await)
        });

    let recipient = warp::path!("me" / "recipient")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_output(handlers::recipient(token, directory).await)
        });

    let gift = warp::path!("me" / "gift")
        .and(warp::put())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory))
        .and_then(
            |token: Option<String>, update: GiftUpdate, directory: Directory| async move {
                to_http_output(handlers::set_gift_status(token, update, directory).await)
            },
        );

    me.or(recipient).or(gift)
}

fn master_data_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let teams = warp::path!("teams")
        .and(warp::get())
        .and(with_directory(directory.clone()))
        .and_then(|directory: Directory| async move {
            to_http_output(handlers::teams(directory).await)
        });

    let add_team = warp::path!("team")
        .and(warp::post())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, team: Name, directory: Directory| async move {
            to_http_output(handlers::add_team(token, team, directory).await)
        });

    let delete_team = warp::path!("team")
        .and(warp::delete())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, team: Id, directory: Directory| async move {
            to_http_none_or_error(handlers::delete_team(token, team, directory).await)
        });

    let designations = warp::path!("designations")
        .and(warp::get())
        .and(with_directory(directory.clone()))
        .and_then(|directory: Directory| async move {
            to_http_output(handlers::designations(directory).await)
        });

    let add_designation = warp::path!("designation")
        .and(warp::post())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory.clone()))
        .and_then(
            |token: Option<String>, designation: Name, directory: Directory| async move {
                to_http_output(handlers::add_designation(token, designation, directory).await)
            },
        );

    let delete_designation = warp::path!("designation")
        .and(warp::delete())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory))
        .and_then(
            |token: Option<String>, designation: Id, directory: Directory| async move {
                to_http_none_or_error(handlers::delete_designation(token, designation, directory).await)
            },
        );

    teams
        .or(add_team)
        .or(delete_team)
        .or(designations)
        .or(add_designation)
        .or(delete_designation)
}

fn participant_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let list_participants = warp::path!("participants")
        .and(warp::get())
        .and(with_session())
        .and(warp::query::<ParticipantQuery>())
        .and(with_directory(directory.clone()))
        .and_then(
            |token: Option<String>, query: ParticipantQuery, directory: Directory| async move {
                to_http_output(handlers::list_participants(token, query, directory).await)
            },
        );

    let update_participant = warp::path!("participant")
        .and(warp::put())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory.clone()))
        .and_then(
            |token: Option<String>, participant: Participant, directory: Directory| async move {
                to_http_none_or_error(handlers::update_participant(token, participant, directory).await)
            },
        );

    let delete_participant = warp::path!("participant")
        .and(warp::delete())
        .and(with_session())
        .and(warp::body::json())
        .and(with_directory(directory))
        .and_then(|token: Option<String>, participant: Id, directory: Directory| async move {
            to_http_none_or_error(handlers::delete_participant(token, participant, directory).await)
        });

    list_participants.or(update_participant).or(delete_participant)
}

fn pairing_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let pairing_state = warp::path!("pairing")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_output(handlers::pairing_state(token, directory).await)
        });

    let initiate_pairing = warp::path!("pairing")
        .and(warp::post())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_output(handlers::initiate_pairing(token, directory).await)
        });

    let analytics = warp::path!("analytics")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_http_output(handlers::analytics(token, directory).await)
        });

    pairing_state.or(initiate_pairing).or(analytics)
}

fn export_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let export_participants = warp::path!("export" / "participants")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory.clone()))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_csv_output(handlers::export_participants(token, directory).await, "users")
        });

    let export_pairings = warp::path!("export" / "pairings")
        .and(warp::get())
        .and(with_session())
        .and(with_directory(directory))
        .and_then(|token: Option<String>, directory: Directory| async move {
            to_csv_output(handlers::export_pairings(token, directory).await, "pairings")
        });

    export_participants.or(export_pairings)
}

pub fn api_filters(
    directory: Directory,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    session_filters(directory.clone())
        .or(me_filters(directory.clone()))
        .or(master_data_filters(directory.clone()))
        .or(participant_filters(directory.clone()))
        .or(pairing_filters(directory.clone()))
        .or(export_filters(directory))
}
