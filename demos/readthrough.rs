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

//! Single-node read-through cache over an in-memory "database".

use std::{collections::HashMap, sync::Arc};

use cachegroup::{new_group, BoxError, GroupConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db: HashMap<&str, &str> = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    let group = new_group(
        GroupConfig::new("scores", 2 << 10),
        Arc::new(move |key: &str| {
            tracing::info!(key, "[slow db] searching");
            db.get(key)
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| -> BoxError { format!("{key} not found").into() })
        }),
    );

    for key in ["Tom", "Tom", "Jack", "unknown"] {
        match group.get(key) {
            Ok(value) => println!("{key} => {}", value.to_string_lossy()),
            Err(err) => println!("{key} => error: {err}"),
        }
    }

    let metrics = group.metrics();
    println!(
        "hits={} misses={} inserts={}",
        metrics.hits, metrics.misses, metrics.inserts
    );

    Ok(())
}
