//! Scenario driver
//!
//! Issues the configured joins, stores, lookups and membership events against
//! a fresh network and reports after each stage. Operations the network
//! refuses are reported and the run carries on.

use anyhow::{Context, Result};
use chordring_core::{ChordNetwork, Key};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{info, warn};

use crate::config::{Config, MembershipEvent};
use crate::report::Reporter;

/// Counters for one scenario run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub joined: usize,
    pub left: usize,
    pub stored: usize,
    pub lookups: usize,
    pub reads: usize,
    pub rejected: usize,
}

/// Run the configured scenario, writing reports to `out`
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<(ChordNetwork, ScenarioSummary)> {
    let reporter = Reporter::new(&config.report);
    let mut network =
        ChordNetwork::new(config.ring).context("Failed to create network")?;
    let mut summary = ScenarioSummary::default();

    info!(
        "Running scenario: {} nodes, {} keys, {} lookups, {} events",
        config.scenario.nodes.len(),
        config.scenario.keys.len(),
        config.scenario.lookups.len(),
        config.scenario.events.len()
    );

    reporter.heading(out, "Initial nodes")?;
    for &id in &config.scenario.nodes {
        match network.add_node(id) {
            Ok(_) => summary.joined += 1,
            Err(e) => {
                warn!("Join of node {} rejected: {}", id, e);
                reporter.rejected(out, &format!("join {}", id), &e)?;
                summary.rejected += 1;
            }
        }
    }
    reporter.nodes(out, &network.snapshot())?;

    reporter.heading(out, "Storing keys")?;
    let mut stored_keys: BTreeSet<Key> = BTreeSet::new();
    for entry in &config.scenario.keys {
        match network.store_key(entry.key, entry.value.clone()) {
            Ok(replicas) => {
                reporter.stored(out, entry.key, &entry.value, &replicas)?;
                stored_keys.insert(entry.key);
                summary.stored += 1;
            }
            Err(e) => {
                warn!("Store of key {} rejected: {}", entry.key, e);
                reporter.rejected(out, &format!("store {}", entry.key), &e)?;
                summary.rejected += 1;
            }
        }
    }

    reporter.heading(out, "Data distribution")?;
    reporter.distribution(out, &network.snapshot())?;

    if !config.scenario.lookups.is_empty() {
        reporter.heading(out, "Lookups")?;
    }
    for lookup in &config.scenario.lookups {
        match network.route_lookup(lookup.start, lookup.key) {
            Ok(route) => {
                reporter.route(out, lookup.start, lookup.key, &route)?;
                summary.lookups += 1;
            }
            Err(e) => {
                warn!(
                    "Lookup of key {} from node {} rejected: {}",
                    lookup.key, lookup.start, e
                );
                let operation = format!("lookup {} from {}", lookup.key, lookup.start);
                reporter.rejected(out, &operation, &e)?;
                summary.rejected += 1;
            }
        }
    }

    for event in &config.scenario.events {
        let outcome = match *event {
            MembershipEvent::Join(id) => {
                reporter.heading(out, &format!("Node {} joins", id))?;
                network.add_node(id).map(|_| {
                    summary.joined += 1;
                    ("joined", id)
                })
            }
            MembershipEvent::Leave(id) => {
                reporter.heading(out, &format!("Node {} leaves", id))?;
                network.remove_node(id).map(|()| {
                    summary.left += 1;
                    ("left", id)
                })
            }
        };

        match outcome {
            Ok((action, id)) => reporter.membership(out, action, id)?,
            Err(e) => {
                warn!("Membership event {:?} rejected: {}", event, e);
                reporter.rejected(out, &format!("{:?}", event).to_lowercase(), &e)?;
                summary.rejected += 1;
            }
        }
        reporter.nodes(out, &network.snapshot())?;
        reporter.distribution(out, &network.snapshot())?;
    }

    if !stored_keys.is_empty() {
        reporter.heading(out, "Reading keys")?;
    }
    for &key in &stored_keys {
        match network.find_key(key) {
            Ok((value, holder)) => {
                reporter.found(out, key, value, holder)?;
                summary.reads += 1;
            }
            Err(e) => {
                warn!("Read of key {} failed: {}", key, e);
                reporter.rejected(out, &format!("read {}", key), &e)?;
                summary.rejected += 1;
            }
        }
    }

    reporter.heading(out, "Statistics")?;
    reporter.statistics(out, &network.stats())?;

    if config.report.visualize {
        reporter.heading(out, "Ring")?;
        reporter.visualize(out, &network.snapshot())?;
    }

    info!(
        "Scenario finished: {} nodes on a 2^{} ring (R={}), {} rejected operations",
        network.len(),
        network.config().id_bits,
        network.config().replication_factor,
        summary.rejected
    );

    Ok((network, summary))
}
