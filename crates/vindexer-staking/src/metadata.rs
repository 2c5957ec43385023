//! Best-effort reads of mutable staking-contract state
//!
//! A read either answers or reverts. A revert never becomes an error for the
//! handler that asked: the entity keeps whatever it had before.

use {
    alloy_primitives::Address,
    anyhow::Context,
    serde::{Deserialize, Serialize},
    std::{collections::HashMap, fs, path::Path},
    thiserror::Error,
    vindexer_common::types::{Amount, Validator},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("call reverted: {0}")]
pub struct Reverted(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorDescription {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub email: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorInfo {
    pub commission_rate: Option<Amount>,
    pub delegator_reward_pool: Option<Amount>,
    pub reward_per_share: Option<Amount>,
}

/// Individual parameter reads; a field is `None` when its own read reverted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterReads {
    pub max_validators: Option<u64>,
    pub min_self_stake: Option<Amount>,
    pub min_delegation: Option<Amount>,
    pub staking_lock_period: Option<u64>,
    pub withdraw_profit_period: Option<u64>,
    pub jail_threshold: Option<u64>,
}

/// Synchronous, bounded reads against the staking contract.
/// Implementations must not retry and must return promptly.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataFetcher: Send + Sync {
    fn describe(&self, validator: &Address) -> Result<ValidatorDescription, Reverted>;

    fn validator_info(&self, validator: &Address) -> Result<ValidatorInfo, Reverted>;

    fn system_parameters(&self) -> Result<ParameterReads, Reverted>;
}

/// Copy a description onto a validator. Empty strings never clear a field.
pub fn apply_description(validator: &mut Validator, description: ValidatorDescription) {
    fn merge(field: &mut Option<String>, value: String) {
        if !value.is_empty() {
            *field = Some(value);
        }
    }

    merge(&mut validator.moniker, description.moniker);
    merge(&mut validator.identity, description.identity);
    merge(&mut validator.website, description.website);
    merge(&mut validator.email, description.email);
    merge(&mut validator.details, description.details);
}

pub fn apply_info(validator: &mut Validator, info: ValidatorInfo) {
    if let Some(rate) = info.commission_rate {
        validator.commission_rate = rate;
    }
    if info.delegator_reward_pool.is_some() {
        validator.delegator_reward_pool = info.delegator_reward_pool;
    }
    if info.reward_per_share.is_some() {
        validator.reward_per_share = info.reward_per_share;
    }
}

/// Fetcher for deployments without contract access: every read reverts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetadataFetcher;

impl MetadataFetcher for NoopMetadataFetcher {
    fn describe(&self, _validator: &Address) -> Result<ValidatorDescription, Reverted> {
        Err(Reverted("metadata reads disabled".to_string()))
    }

    fn validator_info(&self, _validator: &Address) -> Result<ValidatorInfo, Reverted> {
        Err(Reverted("metadata reads disabled".to_string()))
    }

    fn system_parameters(&self) -> Result<ParameterReads, Reverted> {
        Err(Reverted("metadata reads disabled".to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSnapshot {
    pub description: Option<ValidatorDescription>,
    pub info: Option<ValidatorInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    validators: HashMap<String, ValidatorSnapshot>,
    parameters: Option<ParameterReads>,
}

/// Answers reads from a JSON snapshot of contract state taken ahead of a replay.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataFetcher {
    pub validators: HashMap<Address, ValidatorSnapshot>,
    pub parameters: Option<ParameterReads>,
}

impl StaticMetadataFetcher {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata snapshot {}", path.display()))?;
        let file: SnapshotFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse metadata snapshot {}", path.display()))?;

        let mut validators = HashMap::with_capacity(file.validators.len());
        for (key, snapshot) in file.validators {
            let address: Address = key
                .parse()
                .with_context(|| format!("Invalid validator address `{}` in snapshot", key))?;
            validators.insert(address, snapshot);
        }

        Ok(Self {
            validators,
            parameters: file.parameters,
        })
    }
}

impl MetadataFetcher for StaticMetadataFetcher {
    fn describe(&self, validator: &Address) -> Result<ValidatorDescription, Reverted> {
        self.validators
            .get(validator)
            .and_then(|snapshot| snapshot.description.clone())
            .ok_or_else(|| Reverted(format!("no description for {}", validator)))
    }

    fn validator_info(&self, validator: &Address) -> Result<ValidatorInfo, Reverted> {
        self.validators
            .get(validator)
            .and_then(|snapshot| snapshot.info.clone())
            .ok_or_else(|| Reverted(format!("no info for {}", validator)))
    }

    fn system_parameters(&self) -> Result<ParameterReads, Reverted> {
        self.parameters
            .clone()
            .ok_or_else(|| Reverted("no system parameters in snapshot".to_string()))
    }
}
