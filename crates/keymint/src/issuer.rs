//! The Issuer: validates a request, generates credentials and persists the
//! token record.

use tracing::{debug, info, warn};

use keymint_core::{compute_expiry, now_millis, Expiry, TokenRecord, DEFAULT_DAYS};
use keymint_perms::{split_permission_list, EncodedPermissions, PermissionCatalog, PermissionCodec};
use keymint_store::Store;

use crate::error::{IssueError, Result, SaveStep};

/// How a record reaches the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveMode {
    /// Save with the seed mask right after generation, then save again if
    /// the permission list added bits.
    #[default]
    TwoPhase,
    /// Save once with the full mask.
    Single,
}

/// Configuration for the Issuer.
#[derive(Debug, Clone, Default)]
pub struct IssuerConfig {
    pub save_mode: SaveMode,
}

/// Inputs for one issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    /// Expiry offset in days, `-1` for never.
    pub days: i64,
    /// Raw seed mask, OR-ed in verbatim.
    pub raw_permissions: Option<i64>,
    /// Permission list entries: bit positions or level names.
    pub permissions: Vec<String>,
}

impl Default for IssueRequest {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            raw_permissions: None,
            permissions: Vec::new(),
        }
    }
}

impl IssueRequest {
    pub fn new(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn raw_permissions(mut self, raw: i64) -> Self {
        self.raw_permissions = Some(raw);
        self
    }

    pub fn permission(mut self, entry: impl Into<String>) -> Self {
        self.permissions.push(entry.into());
        self
    }

    /// Append the entries of a comma-separated list.
    pub fn permission_list(mut self, list: &str) -> Self {
        self.permissions.extend(split_permission_list(list));
        self
    }

    /// Check the expiry and permissions against `catalog`, relative to `now`.
    ///
    /// Touches no store, so callers can reject bad input before opening one.
    pub fn validate<C: PermissionCatalog>(&self, catalog: &C, now: i64) -> Result<ValidatedRequest> {
        let expiry = compute_expiry(self.days, now)?;
        let permissions = PermissionCodec::new(catalog)
            .encode(self.raw_permissions, &self.permissions[..])?;
        Ok(ValidatedRequest {
            expiry,
            permissions,
        })
    }
}

/// An [`IssueRequest`] whose inputs all resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub expiry: Expiry,
    pub permissions: EncodedPermissions,
}

/// Issues token records into a store.
pub struct Issuer<S: Store, C: PermissionCatalog> {
    store: S,
    codec: PermissionCodec<C>,
    config: IssuerConfig,
}

impl<S: Store, C: PermissionCatalog> Issuer<S, C> {
    /// Create a new issuer.
    pub fn new(store: S, catalog: C, config: IssuerConfig) -> Self {
        Self {
            store,
            codec: PermissionCodec::new(catalog),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &PermissionCodec<C> {
        &self.codec
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Issue a token relative to the current wall clock.
    pub fn issue(&self, request: &IssueRequest) -> Result<TokenRecord> {
        self.issue_at(request, now_millis())
    }

    /// Issue a token created at `now` (Unix milliseconds).
    ///
    /// Every input is validated before credentials are generated, so a
    /// rejected request never consumes an identifier.
    pub fn issue_at(&self, request: &IssueRequest, now: i64) -> Result<TokenRecord> {
        let ValidatedRequest {
            expiry,
            permissions: encoded,
        } = request.validate(self.codec.catalog(), now)?;
        debug!(
            days = request.days,
            base = encoded.base.bits(),
            mask = encoded.mask.bits(),
            "request validated"
        );

        let (id, secret) = self
            .store
            .generate_credentials()
            .map_err(|e| IssueError::GenerationFailure(e.to_string()))?;

        let initial = match self.config.save_mode {
            SaveMode::TwoPhase => encoded.base,
            SaveMode::Single => encoded.mask,
        };
        let mut record = TokenRecord::new(id, secret, expiry, initial, now)?;

        self.store
            .save(&record)
            .map_err(|source| IssueError::PersistenceFailure {
                step: SaveStep::First,
                token: id,
                source,
            })?;

        if record.grant(encoded.mask) {
            if let Err(source) = self.store.save(&record) {
                warn!(
                    token = %id,
                    stored = initial.bits(),
                    wanted = encoded.mask.bits(),
                    error = %source,
                    "token saved without its full permissions"
                );
                return Err(IssueError::PersistenceFailure {
                    step: SaveStep::Second,
                    token: id,
                    source,
                });
            }
        }

        info!(
            token = %id,
            expires_at = ?record.expires_at(),
            permissions = record.permissions().bits(),
            "token issued"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keymint_core::{Permissions, DAY_MILLIS};
    use keymint_perms::StaticCatalog;
    use keymint_store::MemoryStore;

    const NOW: i64 = 1_700_000_000_000;

    fn issuer(mode: SaveMode) -> Issuer<MemoryStore, StaticCatalog> {
        Issuer::new(
            MemoryStore::new(),
            StaticCatalog::builtin(),
            IssuerConfig { save_mode: mode },
        )
    }

    #[test]
    fn test_default_request() {
        let request = IssueRequest::default();
        assert_eq!(request.days, 90);
        assert!(request.raw_permissions.is_none());
        assert!(request.permissions.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = IssueRequest::new(-1)
            .raw_permissions(4)
            .permission_list("read, 3")
            .permission("admin");
        assert_eq!(request.permissions, vec!["read", "3", "admin"]);
        assert_eq!(request.raw_permissions, Some(4));
    }

    #[test]
    fn test_validate_resolves_without_store() {
        let catalog = StaticCatalog::builtin();
        let validated = IssueRequest::new(3)
            .raw_permissions(4)
            .permission("read")
            .validate(&catalog, NOW)
            .unwrap();
        assert_eq!(validated.expiry, Expiry::At(NOW + 3 * DAY_MILLIS));
        assert_eq!(validated.permissions.base.bits(), 4);
        assert_eq!(validated.permissions.mask.bits(), 6);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let catalog = StaticCatalog::builtin();
        assert!(matches!(
            IssueRequest::new(0).validate(&catalog, NOW),
            Err(IssueError::InvalidArgument { field: "days", .. })
        ));
        assert!(matches!(
            IssueRequest::new(1).permission("nope").validate(&catalog, NOW),
            Err(IssueError::UnknownPermissionName(_))
        ));
        assert!(matches!(
            IssueRequest::new(1)
                .permission("99999999999999999999")
                .validate(&catalog, NOW),
            Err(IssueError::InvalidArgument { field: "permissions", .. })
        ));
    }

    #[test]
    fn test_issue_stores_record() {
        let issuer = issuer(SaveMode::TwoPhase);
        let record = issuer
            .issue_at(&IssueRequest::new(7).permission("write"), NOW)
            .unwrap();

        assert_eq!(record.expires_at(), Some(NOW + 7 * DAY_MILLIS));
        assert_eq!(record.created_at(), NOW);
        assert_eq!(record.permissions(), Permissions::from_bits(0b100));
        assert_eq!(issuer.store().get(record.id()).unwrap(), Some(record));
    }

    #[test]
    fn test_single_save_mode_stores_full_mask() {
        let issuer = issuer(SaveMode::Single);
        let record = issuer
            .issue_at(&IssueRequest::new(-1).raw_permissions(4).permission("read"), NOW)
            .unwrap();
        assert_eq!(record.permissions().bits(), 6);
        assert_eq!(
            issuer.store().get(record.id()).unwrap().unwrap().permissions().bits(),
            6
        );
    }

    #[test]
    fn test_invalid_days_stores_nothing() {
        let issuer = issuer(SaveMode::TwoPhase);
        let err = issuer.issue_at(&IssueRequest::new(0), NOW).unwrap_err();
        assert!(matches!(err, IssueError::InvalidArgument { field: "days", .. }));
        assert_eq!(issuer.store().count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_name_stores_nothing() {
        let issuer = issuer(SaveMode::TwoPhase);
        let err = issuer
            .issue_at(&IssueRequest::new(1).permission("admin").permission("nope"), NOW)
            .unwrap_err();
        assert!(matches!(err, IssueError::UnknownPermissionName(ref n) if n == "nope"));
        assert!(!err.record_exists());
        assert_eq!(issuer.store().count().unwrap(), 0);
    }

    #[test]
    fn test_negative_seed_stores_nothing() {
        let issuer = issuer(SaveMode::TwoPhase);
        let err = issuer
            .issue_at(&IssueRequest::new(1).raw_permissions(-5), NOW)
            .unwrap_err();
        assert!(matches!(
            err,
            IssueError::InvalidArgument { field: "raw_permissions", .. }
        ));
        assert_eq!(issuer.store().count().unwrap(), 0);
    }

    #[test]
    fn test_each_issue_gets_fresh_id() {
        let issuer = issuer(SaveMode::TwoPhase);
        let a = issuer.issue_at(&IssueRequest::default(), NOW).unwrap();
        let b = issuer.issue_at(&IssueRequest::default(), NOW).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.secret(), b.secret());
        assert_eq!(issuer.store().count().unwrap(), 2);
    }
}
