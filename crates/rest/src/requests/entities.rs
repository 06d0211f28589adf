//! Group, profile, and thing requests.

use hub_persistence::types::{Group, Metadata, Profile, Thing};
use serde::Deserialize;

use super::{
    Validate, ValidationError, validate_id, validate_ids, validate_name, validate_optional_id,
    validate_token,
};

/// A group as submitted for creation.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    /// Client-chosen identifier; generated when empty.
    #[serde(default)]
    pub id: String,
    /// Group name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A profile as submitted for creation or update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    /// Client-chosen identifier; generated when empty.
    #[serde(default)]
    pub id: String,
    /// Profile name.
    #[serde(default)]
    pub name: String,
    /// Device configuration.
    #[serde(default)]
    pub config: Metadata,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A thing as submitted for creation or update.
#[derive(Debug, Clone, Deserialize)]
pub struct ThingInput {
    /// Client-chosen identifier; generated when empty.
    #[serde(default)]
    pub id: String,
    /// Thing name.
    #[serde(default)]
    pub name: String,
    /// Primary key; generated when empty.
    #[serde(default)]
    pub key: String,
    /// Optional secondary key.
    #[serde(default)]
    pub external_key: Option<String>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

/// `{"groups": [...]}`
#[derive(Debug, Deserialize)]
pub struct GroupsBody {
    /// Groups to create.
    #[serde(default)]
    pub groups: Vec<GroupInput>,
}

/// `{"profiles": [...]}`
#[derive(Debug, Deserialize)]
pub struct ProfilesBody {
    /// Profiles to create.
    #[serde(default)]
    pub profiles: Vec<ProfileInput>,
}

/// `{"things": [...]}`
#[derive(Debug, Deserialize)]
pub struct ThingsBody {
    /// Things to create.
    #[serde(default)]
    pub things: Vec<ThingInput>,
}

/// `{"profile_ids": [...]}`
#[derive(Debug, Deserialize)]
pub struct ProfileIdsBody {
    /// Profiles to remove.
    #[serde(default)]
    pub profile_ids: Vec<String>,
}

/// `{"thing_ids": [...]}`
#[derive(Debug, Deserialize)]
pub struct ThingIdsBody {
    /// Things to remove.
    #[serde(default)]
    pub thing_ids: Vec<String>,
}

/// `{"key": "..."}`
#[derive(Debug, Deserialize)]
pub struct KeyBody {
    /// Replacement primary key.
    #[serde(default)]
    pub key: String,
}

/// `{"profile_id": "..."}`
#[derive(Debug, Deserialize)]
pub struct ProfileRefBody {
    /// Target profile.
    #[serde(default)]
    pub profile_id: String,
}

/// A request naming one entity: view or remove.
#[derive(Debug, Clone)]
pub struct EntityRequest {
    /// Bearer token.
    pub token: String,
    /// Entity identifier.
    pub id: String,
}

impl Validate for EntityRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)
    }
}

/// Bulk removal.
#[derive(Debug, Clone)]
pub struct RemoveRequest {
    /// Bearer token.
    pub token: String,
    /// Entities to remove.
    pub ids: Vec<String>,
}

impl Validate for RemoveRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_ids(&self.ids)
    }
}

/// Bulk group creation within an organization.
#[derive(Debug, Clone)]
pub struct CreateGroupsRequest {
    /// Bearer token.
    pub token: String,
    /// Owning organization.
    pub org_id: String,
    /// Groups to create.
    pub groups: Vec<GroupInput>,
}

impl Validate for CreateGroupsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.org_id)?;
        if self.groups.is_empty() {
            return Err(ValidationError::EmptyList);
        }
        self.groups.iter().try_for_each(|g| {
            validate_optional_id(&g.id)?;
            validate_name(&g.name, true)
        })
    }
}

impl CreateGroupsRequest {
    /// Builds group records owned by `owner_id`.
    pub fn into_groups(self, owner_id: &str) -> Vec<Group> {
        let now = chrono::Utc::now();
        self.groups
            .into_iter()
            .map(|g| Group {
                id: g.id,
                name: g.name,
                org_id: self.org_id.clone(),
                owner_id: owner_id.to_string(),
                description: g.description,
                metadata: g.metadata,
                created_at: now,
                updated_at: now,
            })
            .collect()
    }
}

/// Group update.
#[derive(Debug, Clone)]
pub struct UpdateGroupRequest {
    /// Bearer token.
    pub token: String,
    /// Group identifier.
    pub id: String,
    /// New values.
    pub group: GroupInput,
}

impl Validate for UpdateGroupRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)?;
        validate_name(&self.group.name, true)
    }
}

/// Bulk profile creation within a group.
#[derive(Debug, Clone)]
pub struct CreateProfilesRequest {
    /// Bearer token.
    pub token: String,
    /// Owning group.
    pub group_id: String,
    /// Profiles to create.
    pub profiles: Vec<ProfileInput>,
}

impl Validate for CreateProfilesRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.group_id)?;
        if self.profiles.is_empty() {
            return Err(ValidationError::EmptyList);
        }
        self.profiles.iter().try_for_each(|p| {
            validate_optional_id(&p.id)?;
            validate_name(&p.name, true)
        })
    }
}

impl CreateProfilesRequest {
    /// Builds profile records for the group.
    pub fn into_profiles(self) -> Vec<Profile> {
        let group_id = self.group_id;
        self.profiles
            .into_iter()
            .map(|p| Profile {
                id: p.id,
                name: p.name,
                group_id: group_id.clone(),
                config: p.config,
                metadata: p.metadata,
            })
            .collect()
    }
}

/// Profile update.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    /// Bearer token.
    pub token: String,
    /// Profile identifier.
    pub id: String,
    /// New values.
    pub profile: ProfileInput,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)?;
        validate_name(&self.profile.name, true)
    }
}

/// Bulk thing creation under a profile.
#[derive(Debug, Clone)]
pub struct CreateThingsRequest {
    /// Bearer token.
    pub token: String,
    /// Owning profile.
    pub profile_id: String,
    /// Things to create.
    pub things: Vec<ThingInput>,
}

impl Validate for CreateThingsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.profile_id)?;
        if self.things.is_empty() {
            return Err(ValidationError::EmptyList);
        }
        self.things.iter().try_for_each(|t| {
            validate_optional_id(&t.id)?;
            validate_name(&t.name, true)
        })
    }
}

impl CreateThingsRequest {
    /// Builds thing records for the profile. The group is resolved by storage.
    pub fn into_things(self) -> Vec<Thing> {
        let profile_id = self.profile_id;
        self.things
            .into_iter()
            .map(|t| Thing {
                id: t.id,
                name: t.name,
                key: t.key,
                external_key: t.external_key.filter(|k| !k.is_empty()),
                profile_id: profile_id.clone(),
                group_id: String::new(),
                metadata: t.metadata,
            })
            .collect()
    }
}

/// Thing update: name, external key, and metadata.
#[derive(Debug, Clone)]
pub struct UpdateThingRequest {
    /// Bearer token.
    pub token: String,
    /// Thing identifier.
    pub id: String,
    /// New values.
    pub thing: ThingInput,
}

impl Validate for UpdateThingRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)?;
        validate_name(&self.thing.name, true)
    }
}

/// Primary key replacement.
#[derive(Debug, Clone)]
pub struct UpdateKeyRequest {
    /// Bearer token.
    pub token: String,
    /// Thing identifier.
    pub id: String,
    /// New primary key.
    pub key: String,
}

impl Validate for UpdateKeyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)?;
        if self.key.is_empty() {
            return Err(ValidationError::MissingKey);
        }
        Ok(())
    }
}

/// Moves a thing to another profile.
#[derive(Debug, Clone)]
pub struct ReparentThingRequest {
    /// Bearer token.
    pub token: String,
    /// Thing identifier.
    pub id: String,
    /// Target profile.
    pub profile_id: String,
}

impl Validate for ReparentThingRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.id)?;
        validate_id(&self.profile_id)
    }
}

/// Device self-identification by key.
#[derive(Debug, Clone)]
pub struct IdentifyRequest {
    /// Thing key.
    pub key: String,
}

impl Validate for IdentifyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.key.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        Ok(())
    }
}
