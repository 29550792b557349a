//! The change-request state machine on a brand node.

use crate::{Result as SyncResult, SyncError};

use idhub_core::{ChangeRequest, LocalUser, PatchField, ProposedProfile, compute_profile_diff};
use idhub_db::{ChangeRequestRepository, LocalUserRepository};

use std::str::FromStr;

use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

/// What `raise` decided, plus the write the caller must persist in place of
/// the intercepted edit.
#[derive(Debug)]
pub struct RaiseOutcome {
    pub request: Option<ChangeRequest>,
    /// The profile as it must be stored: always the unchanged current values,
    /// because intercepted fields wait for approval.
    pub write: LocalUser,
}

pub struct ChangeRequestService {
    requests: ChangeRequestRepository,
    users: LocalUserRepository,
}

impl ChangeRequestService {
    pub fn new(requests: ChangeRequestRepository, users: LocalUserRepository) -> Self {
        Self { requests, users }
    }

    /// Intercept a profile edit before it is persisted.
    ///
    /// Diffs the proposal against stored values over the fixed allow-list
    /// plus metadata keys. No diff: nothing to request. Pending request
    /// already open: the new diff is silently dropped (first-pending-wins).
    /// Either way the returned write carries the old values back, so the
    /// live profile stays unchanged until approval.
    pub async fn raise(
        &self,
        user_id: Uuid,
        proposed: &ProposedProfile,
        requested_by: &str,
    ) -> SyncResult<RaiseOutcome> {
        let current = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| SyncError::user_not_found(user_id.to_string()))?;

        let (data, metadata) = compute_profile_diff(&current, proposed);
        if data.is_empty() && metadata.is_empty() {
            debug!("No intercepted changes for user {}", user_id);
            return Ok(RaiseOutcome {
                request: None,
                write: current,
            });
        }

        let request = ChangeRequest::new_pending(
            user_id.to_string(),
            data,
            metadata,
            requested_by.to_string(),
        );

        let created = self.requests.create_pending(&request).await?;
        if !created {
            debug!(
                "User {} already has a pending request, dropping new diff",
                user_id
            );
            return Ok(RaiseOutcome {
                request: None,
                write: current,
            });
        }

        info!("Raised change request {} for user {}", request.id, user_id);
        Ok(RaiseOutcome {
            request: Some(request),
            write: current,
        })
    }

    /// Apply an approval: transition pending -> approved, then patch every
    /// approved `new` value onto the live profile. The transition claims the
    /// request atomically, so a racing second approval gets "not pending".
    pub async fn approve(&self, request_id: Uuid) -> SyncResult<ChangeRequest> {
        let approved = self.requests.approve(request_id).await?;

        let user_id = Uuid::parse_str(&approved.user_id)
            .map_err(|_| SyncError::user_not_found(approved.user_id.clone()))?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| SyncError::user_not_found(approved.user_id.clone()))?;

        for (field_name, change) in &approved.data {
            let field = PatchField::from_str(field_name)?;
            field.apply(&mut user, &change.new);
        }
        for (key, change) in &approved.metadata {
            user.meta.insert(key.clone(), change.new.clone());
        }
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        info!("Applied change request {} to user {}", request_id, user_id);
        Ok(approved)
    }

    /// Reject with a mandatory comment. No profile data changes.
    pub async fn reject(&self, request_id: Uuid, comment: &str) -> SyncResult<ChangeRequest> {
        if comment.trim().is_empty() {
            return Err(SyncError::validation("rejection requires a comment"));
        }

        let rejected = self.requests.reject(request_id, comment).await?;
        info!("Rejected change request {}", request_id);
        Ok(rejected)
    }
}
