//  Copyright 2024 Cachegroup Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Two-node cluster demo: keys are routed to their owning node via a consistent-hash ring.
//!
//! Peer transport is simulated in-process (each node's `PeerGetter` calls the other node's
//! `Group` directly) since the wire transport is outside this crate's scope -- a real
//! deployment would implement `PeerGetter`/`PeerPicker` over HTTP or another RPC mechanism.

use std::{collections::HashMap, sync::Arc};

use cachegroup::{BoxError, Group, GroupConfig, HashRing, PeerGetter, PeerPicker};

struct RemoteNode {
    group: Arc<Group>,
}

impl PeerGetter for RemoteNode {
    fn get(&self, _group: &str, key: &str) -> Result<Vec<u8>, BoxError> {
        self.group
            .get(key)
            .map(|view| view.to_vec())
            .map_err(|err| Box::new(err) as BoxError)
    }
}

struct RingPicker {
    ring: Arc<HashRing>,
    self_name: String,
    peers: HashMap<String, Arc<dyn PeerGetter>>,
}

impl PeerPicker for RingPicker {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let owner = self.ring.get(key)?;
        if owner == self.self_name {
            None
        } else {
            self.peers.get(owner).cloned()
        }
    }
}

fn make_node(name: &str, db: HashMap<&'static str, &'static str>) -> Arc<Group> {
    Arc::new(Group::new(
        GroupConfig::new(name, 2 << 10),
        Arc::new(move |key: &str| {
            tracing::info!(node = name, key, "loading from this node's shard");
            db.get(key)
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| -> BoxError { format!("{key} not found on {name}").into() })
        }),
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let node_a = make_node(
        "node-a",
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]),
    );
    let node_b = make_node(
        "node-b",
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]),
    );

    let mut ring = HashRing::new(50, None);
    ring.add(&["node-a", "node-b"]);
    let ring = Arc::new(ring);

    let peers_for_a: HashMap<String, Arc<dyn PeerGetter>> =
        HashMap::from([("node-b".to_string(), Arc::new(RemoteNode { group: node_b.clone() }) as Arc<dyn PeerGetter>)]);
    let peers_for_b: HashMap<String, Arc<dyn PeerGetter>> =
        HashMap::from([("node-a".to_string(), Arc::new(RemoteNode { group: node_a.clone() }) as Arc<dyn PeerGetter>)]);

    node_a.register_peers(Arc::new(RingPicker {
        ring: ring.clone(),
        self_name: "node-a".to_string(),
        peers: peers_for_a,
    }));
    node_b.register_peers(Arc::new(RingPicker {
        ring: ring.clone(),
        self_name: "node-b".to_string(),
        peers: peers_for_b,
    }));

    for key in ["Tom", "Jack", "Sam"] {
        let owner = ring.get(key).unwrap_or("node-a");
        println!("key {key} owned by {owner}");
        // Any node can be asked; the picker routes to the owner transparently.
        let value = node_a.get(key)?;
        println!("  node_a.get({key}) => {}", value.to_string_lossy());
    }

    Ok(())
}
