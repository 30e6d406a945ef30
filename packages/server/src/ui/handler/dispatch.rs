//! Inbound event dispatch.
//!
//! Turns one text frame into a use case call. Raw fields are converted to
//! value objects here; validation failures of `create_room` / `join_room` are
//! reported to the sender, everything else that fails validation is dropped.

use crate::{
    domain::{
        ConnectionId, Identity, MessageContent, Notification, RoomError, RoomId, RoomSecret,
        RoomTitle, Username,
    },
    infrastructure::dto::websocket::{ClientEvent, RawRoomId},
    ui::state::AppState,
};

/// Per-socket context owned by the receive task
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub identity: Identity,
}

pub async fn dispatch(state: &AppState, session: &Session, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Dropping malformed event from '{}': {}",
                session.connection_id,
                e
            );
            return;
        }
    };
    tracing::debug!("Event from '{}': {:?}", session.connection_id, event);

    match event {
        ClientEvent::CreateRoom {
            room,
            secret,
            title,
            username,
        } => create_room(state, session, room, secret, title, username).await,
        ClientEvent::JoinRoom {
            room,
            secret,
            username,
        } => join_room(state, session, room, secret, username).await,
        ClientEvent::LeaveRoom { room } => {
            if let Some(room_id) = room_or_drop(session, &room) {
                state
                    .leave_room_usecase
                    .execute(room_id, session.connection_id)
                    .await;
            }
        }
        ClientEvent::SendMessage { room, message } => {
            let Some(room_id) = room_or_drop(session, &room) else {
                return;
            };
            match MessageContent::new(message) {
                Ok(content) => {
                    state
                        .send_message_usecase
                        .execute(room_id, session.connection_id, content)
                        .await;
                }
                Err(e) => tracing::warn!(
                    "Dropping message from '{}': {}",
                    session.connection_id,
                    e
                ),
            }
        }
        ClientEvent::RemoveUser { room, target } => {
            if let Some((room_id, target)) = admin_target(session, &room, &target) {
                state
                    .remove_user_usecase
                    .execute(room_id, session.connection_id, target)
                    .await;
            }
        }
        ClientEvent::MakeAdmin { room, target } => {
            if let Some((room_id, target)) = admin_target(session, &room, &target) {
                state
                    .make_admin_usecase
                    .execute(room_id, session.connection_id, target)
                    .await;
            }
        }
        ClientEvent::EndRoom { room } => {
            if let Some(room_id) = room_or_drop(session, &room) {
                state
                    .end_room_usecase
                    .execute(room_id, session.connection_id)
                    .await;
            }
        }
    }
}

async fn create_room(
    state: &AppState,
    session: &Session,
    room: Option<RawRoomId>,
    secret: Option<String>,
    title: Option<String>,
    username: String,
) {
    let parsed = parse_room_request(state, room.as_ref(), username).and_then(|(room_id, username)| {
        RoomTitle::parse(title.as_deref())
            .map(|title| (room_id, username, title))
            .map_err(|e| RoomError::InvalidTitle(e.to_string()))
    });
    let result = match parsed {
        Ok((room_id, username, title)) => {
            state
                .create_room_usecase
                .execute(
                    session.connection_id,
                    session.identity.user_id.clone(),
                    room_id,
                    username,
                    RoomSecret::parse(secret.as_deref()),
                    title,
                )
                .await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::warn!("create_room from '{}' rejected: {}", session.connection_id, e);
        reply(state, session, Notification::CreateError {
            message: e.to_string(),
        })
        .await;
    }
}

async fn join_room(
    state: &AppState,
    session: &Session,
    room: Option<RawRoomId>,
    secret: Option<String>,
    username: String,
) {
    let result = match parse_room_request(state, room.as_ref(), username) {
        Ok((room_id, username)) => {
            state
                .join_room_usecase
                .execute(
                    session.connection_id,
                    session.identity.user_id.clone(),
                    room_id,
                    username,
                    RoomSecret::parse(secret.as_deref()),
                )
                .await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::warn!("join_room from '{}' rejected: {}", session.connection_id, e);
        reply(state, session, Notification::JoinError {
            message: e.to_string(),
        })
        .await;
    }
}

fn parse_room_request(
    state: &AppState,
    room: Option<&RawRoomId>,
    username: String,
) -> Result<(RoomId, Username), RoomError> {
    let room_id = room
        .and_then(|raw| RoomId::try_from(raw).ok())
        .ok_or(RoomError::InvalidRoom {
            max_room_id: state.policy.max_room_id,
        })?;
    let username =
        Username::new(username).map_err(|e| RoomError::InvalidUsername(e.to_string()))?;
    Ok((room_id, username))
}

fn room_or_drop(session: &Session, room: &RawRoomId) -> Option<RoomId> {
    match RoomId::try_from(room) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            tracing::warn!("Dropping event from '{}': {}", session.connection_id, e);
            None
        }
    }
}

fn admin_target(
    session: &Session,
    room: &RawRoomId,
    target: &str,
) -> Option<(RoomId, ConnectionId)> {
    let room_id = room_or_drop(session, room)?;
    match ConnectionId::parse(target) {
        Ok(target) => Some((room_id, target)),
        Err(e) => {
            tracing::warn!("Dropping event from '{}': {}", session.connection_id, e);
            None
        }
    }
}

async fn reply(state: &AppState, session: &Session, notification: Notification) {
    if let Err(e) = state
        .message_pusher
        .push_to(&session.connection_id, &notification)
        .await
    {
        tracing::warn!("Failed to reply to '{}': {}", session.connection_id, e);
    }
}
