//! # Simulated Remote Ledger
//!
//! Plays the remote side of every handshake: reads what the manager emitted,
//! keeps its own authoritative view of the validator set, and delivers
//! attested acknowledgments back through the same in-memory gateway.

use l1_validator_manager::prelude::*;
use l1_validator_manager::ValidatorManagerResult;
use std::collections::BTreeMap;

// =============================================================================
// Fixtures
// =============================================================================

pub const NOW: u64 = 1_700_000_000;
pub const SUBNET: ChainId = ChainId([0x11; 32]);
pub const CHAIN: ChainId = ChainId([0x22; 32]);
pub const MANAGER: Address = Address([0x33; 20]);
pub const GATEWAY_SECRET: [u8; 32] = [0x5A; 32];
/// Weight of the single genesis validator a `Deployment::seeded` starts with.
pub const SEED_WEIGHT: u64 = 1_000;

pub fn config() -> ValidatorManagerConfig {
    ValidatorManagerConfig::new(SUBNET, CHAIN, MANAGER)
}

pub fn node(byte: u8) -> NodeId {
    NodeId([byte; 20])
}

/// A registration for `node(byte)` expiring an hour after `now`.
pub fn request(byte: u8, weight: u64, now: u64) -> RegistrationRequest {
    RegistrationRequest {
        node_id: node(byte),
        bls_public_key: BlsPublicKey([byte; 48]),
        expiry: now + 3_600,
        remaining_balance_owner: PChainOwner::single(Address([0xA0; 20])),
        disable_owner: PChainOwner::single(Address([0xB0; 20])),
        weight,
    }
}

/// Conversion data for this subnet with one initial validator per weight.
pub fn conversion(weights: &[u64]) -> ConversionData {
    ConversionData {
        l1_id: SUBNET,
        coordinator_chain_id: CHAIN,
        coordinator_address: MANAGER,
        initial_validators: weights
            .iter()
            .enumerate()
            .map(|(i, weight)| InitialValidator {
                node_id: NodeId([0xF0 ^ i as u8; 20]),
                bls_public_key: BlsPublicKey([i as u8; 48]),
                weight: *weight,
            })
            .collect(),
    }
}

// =============================================================================
// Remote ledger
// =============================================================================

/// An acknowledgment the remote ledger delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Registration {
        validation_id: ValidationId,
        index: MessageIndex,
    },
    Weight {
        validation_id: ValidationId,
        nonce: u64,
        weight: u64,
        index: MessageIndex,
    },
}

impl Acknowledgment {
    pub fn index(&self) -> MessageIndex {
        match self {
            Self::Registration { index, .. } | Self::Weight { index, .. } => *index,
        }
    }

    pub fn validation_id(&self) -> ValidationId {
        match self {
            Self::Registration { validation_id, .. } | Self::Weight { validation_id, .. } => {
                *validation_id
            }
        }
    }
}

pub struct RemoteLedger {
    gateway: Arc<InMemoryMessageGateway>,
    ledger_id: ChainId,
    weights: BTreeMap<ValidationId, u64>,
    nonces: BTreeMap<ValidationId, u64>,
}

impl RemoteLedger {
    pub fn new(gateway: Arc<InMemoryMessageGateway>) -> Self {
        Self {
            gateway,
            ledger_id: ChainId::ZERO,
            weights: BTreeMap::new(),
            nonces: BTreeMap::new(),
        }
    }

    /// Record the conversion and attest its hash.
    pub fn convert(&mut self, data: &ConversionData) -> MessageIndex {
        for (i, validator) in (0u32..).zip(&data.initial_validators) {
            self.weights
                .insert(genesis_validation_id(data.l1_id, i), validator.weight);
        }
        let conversion_id = conversion_id(data).expect("conversion data encodes");
        self.send(&WarpPayload::Conversion(ConversionAttestation { conversion_id }))
    }

    /// Answer everything the manager emitted since the last call.
    ///
    /// A registration is acknowledged every time it is seen. A weight change
    /// is applied and acknowledged only if its nonce is not older than the
    /// last one applied.
    pub fn process_outbox(&mut self) -> Vec<Acknowledgment> {
        self.gateway
            .drain_outbox()
            .into_iter()
            .filter_map(|emitted| self.observe(&emitted.message))
            .collect()
    }

    /// Drop `validation_id` out of band and tell the manager.
    pub fn invalidate(&mut self, validation_id: ValidationId) -> MessageIndex {
        self.weights.remove(&validation_id);
        self.send(&WarpPayload::ValidationInvalidated(ValidationInvalidatedAck {
            validation_id,
        }))
    }

    /// Deliver `payload` as if this ledger produced it.
    pub fn send(&self, payload: &WarpPayload) -> MessageIndex {
        let bytes = encode_payload(payload).expect("payload encodes");
        self.gateway.deliver_from(self.ledger_id, bytes)
    }

    pub fn weight_of(&self, validation_id: &ValidationId) -> Option<u64> {
        self.weights.get(validation_id).copied()
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.values().sum()
    }

    pub fn gateway(&self) -> &Arc<InMemoryMessageGateway> {
        &self.gateway
    }

    fn observe(&mut self, message: &WarpMessage) -> Option<Acknowledgment> {
        match decode_payload(&message.payload).ok()? {
            WarpPayload::RegisterValidator(request) => {
                let validation_id = validation_id(&request).ok()?;
                self.weights.entry(validation_id).or_insert(request.weight);
                self.nonces.entry(validation_id).or_insert(0);
                let index = self.send(&WarpPayload::ValidatorRegistration(
                    ValidatorRegistrationAck { validation_id },
                ));
                Some(Acknowledgment::Registration {
                    validation_id,
                    index,
                })
            }
            WarpPayload::SetValidatorWeight(update) => {
                let applied = self.nonces.entry(update.validation_id).or_insert(0);
                if update.nonce < *applied {
                    return None;
                }
                *applied = update.nonce;
                if update.weight == 0 {
                    self.weights.remove(&update.validation_id);
                } else {
                    self.weights.insert(update.validation_id, update.weight);
                }
                let index = self.send(&WarpPayload::ValidatorWeight(ValidatorWeightAck {
                    validation_id: update.validation_id,
                    nonce: update.nonce,
                    weight: update.weight,
                }));
                Some(Acknowledgment::Weight {
                    validation_id: update.validation_id,
                    nonce: update.nonce,
                    weight: update.weight,
                    index,
                })
            }
            _ => None,
        }
    }
}

// =============================================================================
// Deployment harness
// =============================================================================

pub type Manager<S> = ValidatorManager<S, InMemoryMessageGateway, InMemoryEventLog, ManualClock>;

/// A manager wired to a remote ledger over one shared gateway.
pub struct Deployment<S: KeyValueStore> {
    pub manager: Arc<Manager<S>>,
    pub gateway: Arc<InMemoryMessageGateway>,
    pub events: Arc<InMemoryEventLog>,
    pub clock: Arc<ManualClock>,
    pub ledger: RemoteLedger,
    config: ValidatorManagerConfig,
}

impl<S: KeyValueStore> Deployment<S> {
    pub fn new(config: ValidatorManagerConfig, store: S) -> Self {
        let gateway = Arc::new(InMemoryMessageGateway::new(MessageAuthenticator::new(
            GATEWAY_SECRET,
        )));
        let ledger = RemoteLedger::new(gateway.clone());
        Self::assemble(
            config,
            store,
            gateway,
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(NOW)),
            ledger,
        )
    }

    /// A deployment whose set was initialized with one `SEED_WEIGHT` validator.
    pub fn seeded(config: ValidatorManagerConfig, store: S) -> Self {
        let mut deployment = Self::new(config, store);
        deployment.genesis(&[SEED_WEIGHT]);
        deployment
    }

    fn assemble(
        config: ValidatorManagerConfig,
        store: S,
        gateway: Arc<InMemoryMessageGateway>,
        events: Arc<InMemoryEventLog>,
        clock: Arc<ManualClock>,
        ledger: RemoteLedger,
    ) -> Self {
        let manager = ValidatorManager::new(
            config.clone(),
            ValidatorManagerDependencies {
                store,
                gateway: gateway.clone(),
                events: events.clone(),
                clock: clock.clone(),
            },
        )
        .expect("deployment config is valid");
        Self {
            manager: Arc::new(manager),
            gateway,
            events,
            clock,
            ledger,
            config,
        }
    }

    /// Stop the manager and start a fresh one over the same store, gateway and ledger.
    pub fn restart(self) -> Self {
        let store = Arc::try_unwrap(self.manager)
            .ok()
            .expect("manager is not shared at restart")
            .into_store();
        Self::assemble(
            self.config,
            store,
            self.gateway,
            self.events,
            self.clock,
            self.ledger,
        )
    }

    /// Stop the manager, drop its store handle and start over `store`.
    pub fn restart_over(self, store: S) -> Self {
        drop(self.manager);
        Self::assemble(
            self.config,
            store,
            self.gateway,
            self.events,
            self.clock,
            self.ledger,
        )
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn genesis(&mut self, weights: &[u64]) -> Vec<ValidationId> {
        let data = conversion(weights);
        let index = self.ledger.convert(&data);
        self.manager
            .initialize_validator_set(data, index)
            .expect("genesis succeeds")
    }

    /// Deliver `ack` to the matching completion entry point.
    pub fn complete(&self, ack: &Acknowledgment) -> ValidatorManagerResult<ValidationId> {
        match ack {
            Acknowledgment::Registration { index, .. } => {
                self.manager.complete_validator_registration(*index)
            }
            Acknowledgment::Weight { index, .. } => {
                self.manager.complete_validator_weight_update(*index)
            }
        }
    }

    /// Let the ledger answer the outbox and hand every acknowledgment back.
    pub fn relay(&mut self) -> Vec<ValidatorManagerResult<ValidationId>> {
        self.ledger
            .process_outbox()
            .iter()
            .map(|ack| self.complete(ack))
            .collect()
    }

    /// Full registration handshake for `node(byte)`.
    pub fn register(&mut self, byte: u8, weight: u64) -> ValidationId {
        let id = self
            .manager
            .initiate_validator_registration(request(byte, weight, self.now()))
            .expect("registration initiates");
        for result in self.relay() {
            result.expect("registration completes");
        }
        id
    }

    /// Full weight handshake; returns the nonce used.
    pub fn set_weight(&mut self, validation_id: &ValidationId, weight: u64) -> u64 {
        let nonce = self
            .manager
            .initiate_validator_weight_update(validation_id, weight)
            .expect("weight update initiates");
        for result in self.relay() {
            result.expect("weight update completes");
        }
        nonce
    }
}
