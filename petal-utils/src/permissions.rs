use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    guild::Permissions,
    id::{Id, marker::RoleMarker},
};

/// Everything a role check looks at, resolved for one message author.
#[derive(Clone, Debug)]
pub struct AuthorClearance {
    pub is_bot_owner: bool,
    pub is_guild_owner: bool,
    pub permissions: Permissions,
    pub roles: Vec<Id<RoleMarker>>,
}

impl Default for AuthorClearance {
    fn default() -> Self {
        Self {
            is_bot_owner: false,
            is_guild_owner: false,
            permissions: Permissions::empty(),
            roles: Vec::new(),
        }
    }
}

impl AuthorClearance {
    /// Owners, guild owners and administrators always pass. Everyone else
    /// needs one of `roles`.
    pub fn satisfies(&self, roles: &[u64]) -> bool {
        self.is_bot_owner
            || self.is_guild_owner
            || self.permissions.contains(Permissions::ADMINISTRATOR)
            || self.roles.iter().any(|role| roles.contains(&role.get()))
    }
}

/// Resolve the invoking author's effective guild permissions for a message command.
///
/// Returns `Ok(None)` when the message is not from a guild context.
pub async fn resolve_message_author_permissions(
    http: &Client,
    msg: &MessageCreate,
) -> anyhow::Result<Option<Permissions>> {
    if let Some(perms) = msg.member.as_ref().and_then(|m| m.permissions) {
        return Ok(Some(perms));
    }

    let Some(guild_id) = msg.guild_id else {
        return Ok(None);
    };

    let member_roles = match msg.member.as_ref() {
        Some(member) => member.roles.clone(),
        None => {
            http.guild_member(guild_id, msg.author.id)
                .await?
                .model()
                .await?
                .roles
        }
    };

    let roles = http.roles(guild_id).await?.model().await?;

    let resolved = roles
        .into_iter()
        .filter(|role| role.id == guild_id.cast() || member_roles.contains(&role.id))
        .fold(Permissions::empty(), |acc, role| acc | role.permissions);

    Ok(Some(resolved))
}

/// Check whether the message author clears a role requirement.
///
/// Bot owners pass everywhere. Anyone else fails outside a guild.
pub async fn has_roles(
    http: &Client,
    msg: &MessageCreate,
    owner_ids: &[u64],
    roles: &[u64],
) -> anyhow::Result<bool> {
    if owner_ids.contains(&msg.author.id.get()) {
        return Ok(true);
    }

    let Some(guild_id) = msg.guild_id else {
        return Ok(false);
    };

    let mut clearance = AuthorClearance {
        roles: msg
            .member
            .as_ref()
            .map(|member| member.roles.clone())
            .unwrap_or_default(),
        ..AuthorClearance::default()
    };
    if clearance.satisfies(roles) {
        return Ok(true);
    }

    clearance.permissions = resolve_message_author_permissions(http, msg)
        .await?
        .unwrap_or_else(Permissions::empty);
    if clearance.satisfies(roles) {
        return Ok(true);
    }

    let guild = http.guild(guild_id).await?.model().await?;
    clearance.is_guild_owner = guild.owner_id == msg.author.id;

    Ok(clearance.satisfies(roles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clearance_grants_nothing() {
        let clearance = AuthorClearance::default();

        assert!(clearance.permissions.is_empty());
        assert!(!clearance.satisfies(&[]));
        assert!(!clearance.satisfies(&[1]));
    }

    #[test]
    fn listed_role_passes() {
        let clearance = AuthorClearance {
            roles: vec![Id::new(5), Id::new(9)],
            ..AuthorClearance::default()
        };

        assert!(clearance.satisfies(&[9]));
        assert!(!clearance.satisfies(&[4]));
    }

    #[test]
    fn admin_level_needs_privilege() {
        let member = AuthorClearance {
            permissions: Permissions::MANAGE_MESSAGES,
            roles: vec![Id::new(5)],
            ..AuthorClearance::default()
        };
        assert!(!member.satisfies(&[]));

        let admin = AuthorClearance {
            permissions: Permissions::ADMINISTRATOR,
            ..AuthorClearance::default()
        };
        assert!(admin.satisfies(&[]));

        let guild_owner = AuthorClearance {
            is_guild_owner: true,
            ..AuthorClearance::default()
        };
        assert!(guild_owner.satisfies(&[]));
    }
}
