/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Reference architecture: four cognitive-theory modules plus a meta-network.
//!
//! | Module | Nodes | Topology |
//! |--------|-------|----------|
//! | `ext_global_workspace` | 6 | Hub-and-spoke with attention gating |
//! | `ext_recurrence` | 5 | Local and global feedback loops |
//! | `ext_higher_order` | 5 | Meta-representation, confidence, report |
//! | `ext_attention_schema` | 6 | Attention model with body and social models |
//! | `meta_network` | 4 | One node per module, in the order above |
//!
//! Meta-network edges: GW ↔ Recurrence, GW ↔ Higher-Order,
//! Higher-Order ↔ Attention Schema, Recurrence ↔ Attention Schema.

use crate::error::Result;
use crate::network::{NetworkModel, State};

use super::{MetaNetworkSpec, ModuleSet};

fn bits<const N: usize>(s: &State) -> [u8; N] {
    core::array::from_fn(|i| u8::from(s.bit(i)))
}

/// Global workspace, 6 nodes.
pub fn global_workspace() -> Result<NetworkModel> {
    NetworkModel::from_rule(
        "ext_global_workspace",
        |s| {
            let [input, hub, memory, executive, language, attention] = bits::<6>(s);
            vec![
                attention == 1 || input == 1,
                (input + memory + language >= 2 && attention == 1) || (hub == 1 && attention == 1),
                (hub == 1 && executive == 0) || memory == 1,
                hub == 1 && (executive == 1 || language == 1),
                hub == 1 || (language == 1 && attention == 1),
                executive == 1 || input == 1 || attention == 1,
            ]
        },
        vec![
            vec![0, 1, 0, 0, 0, 0],
            vec![0, 0, 1, 1, 1, 0],
            vec![0, 1, 0, 0, 0, 0],
            vec![1, 0, 0, 0, 0, 1],
            vec![0, 1, 0, 1, 0, 0],
            vec![1, 1, 0, 0, 1, 0],
        ],
        vec![
            "SensoryInput",
            "WorkspaceHub",
            "EpisodicMemory",
            "ExecutiveControl",
            "LanguageProcessor",
            "AttentionGate",
        ],
    )
}

/// Recurrent processing, 5 nodes.
pub fn recurrence() -> Result<NetworkModel> {
    NetworkModel::from_rule(
        "ext_recurrence",
        |s| {
            let [sweep, local, global, temporal, hub] = bits::<5>(s);
            vec![
                hub == 0 || sweep == 1,
                sweep == 1 || (local == 1 && global == 1),
                (local == 1 && hub == 1) || (global == 1 && temporal == 1),
                global == 1 || (temporal == 1 && local == 1),
                local + global + temporal >= 2,
            ]
        },
        vec![
            vec![0, 1, 0, 0, 0],
            vec![0, 0, 1, 0, 1],
            vec![0, 1, 0, 1, 1],
            vec![0, 1, 1, 0, 0],
            vec![1, 0, 0, 0, 0],
        ],
        vec![
            "FeedforwardSweep",
            "LocalRecurrence",
            "GlobalRecurrence",
            "TemporalBinding",
            "IntegrationHub",
        ],
    )
}

/// Higher-order representation, 5 nodes.  The report node has no outputs.
pub fn higher_order() -> Result<NetworkModel> {
    NetworkModel::from_rule(
        "ext_higher_order",
        |s| {
            let [first, second, self_model, confidence, _report] = bits::<5>(s);
            vec![
                first == 1,
                (first == 1 && self_model == 1) || (second == 1 && confidence == 1),
                second == 1 || self_model == 1,
                (second == 1 && first == 1) || (confidence == 1 && self_model == 1),
                second == 1 && confidence == 1,
            ]
        },
        vec![
            vec![0, 1, 0, 0, 0],
            vec![0, 0, 1, 1, 1],
            vec![0, 1, 0, 0, 0],
            vec![0, 1, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
        ],
        vec![
            "FirstOrderState",
            "SecondOrderState",
            "SelfModel",
            "ConfidenceMonitor",
            "ReportGenerator",
        ],
    )
}

/// Attention schema, 6 nodes.
pub fn attention_schema() -> Result<NetworkModel> {
    NetworkModel::from_rule(
        "ext_attention_schema",
        |s| {
            let [bottom_up, top_down, schema, body, social, control] = bits::<6>(s);
            vec![
                control == 1 || bottom_up == 1,
                (schema == 1 && control == 1) || top_down == 1,
                bottom_up + top_down + body >= 2 || (schema == 1 && social == 1),
                schema == 1 || body == 1,
                (schema == 1 && top_down == 1) || social == 1,
                schema == 1 && bottom_up != top_down,
            ]
        },
        vec![
            vec![0, 0, 1, 0, 0, 0],
            vec![0, 0, 1, 0, 0, 0],
            vec![0, 1, 0, 1, 1, 1],
            vec![0, 0, 1, 0, 0, 0],
            vec![0, 0, 1, 0, 0, 0],
            vec![1, 1, 0, 0, 0, 0],
        ],
        vec![
            "BottomUpAttention",
            "TopDownAttention",
            "AttentionSchema",
            "BodySchema",
            "SocialModel",
            "ControlSignal",
        ],
    )
}

/// Fixed Boolean law over the four module-activation bits.
pub fn meta_spec() -> MetaNetworkSpec {
    MetaNetworkSpec {
        name: "meta_network".into(),
        rule: Box::new(|s| {
            let [gw, rec, ho, att] = bits::<4>(s);
            let active = gw + rec + ho + att;
            vec![
                rec == 1 || (ho == 1 && att == 1) || (gw == 1 && active >= 2),
                gw == 1 || (att == 1 && rec == 1),
                (gw == 1 && att == 1) || (ho == 1 && rec == 1) || active >= 3,
                ho == 1 || (rec == 1 && gw == 0) || (att == 1 && active >= 2),
            ]
        }),
        connectivity: vec![
            vec![0, 1, 1, 0],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![0, 1, 1, 0],
        ],
        labels: ["GW_Module", "Recurrence_Module", "HigherOrder_Module", "AttentionSchema_Module"]
            .map(String::from)
            .to_vec(),
    }
}

/// The four modules in meta-node order, with [`meta_spec`].
pub fn workspace_set() -> Result<ModuleSet> {
    let mut set = ModuleSet::new(meta_spec());
    set.push(global_workspace()?)?;
    set.push(recurrence()?)?;
    set.push(higher_order()?)?;
    set.push(attention_schema()?)?;
    Ok(set)
}
