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

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::{Condvar, Mutex};

/// Shared state of a single in-flight call, guarded by `SingleFlight`'s own mutex and woken
/// through its condition variable rather than an async channel -- this crate's concurrency
/// model is parallel OS threads, not async tasks.
struct Call<V, E> {
    done: bool,
    result: Option<Result<V, E>>,
}

/// Coalesces concurrent calls for the same key into a single execution.
///
/// For any set of concurrent callers with the same key, `do_call` guarantees exactly one of
/// them executes the supplied closure; every caller, including the executor, observes the same
/// `Result`. A call started after the prior one for that key has completed (and been removed)
/// executes the closure again.
pub struct SingleFlight<K, V, E> {
    calls: Mutex<HashMap<K, Arc<(Mutex<Call<V, E>>, Condvar)>>>,
}

impl<K, V, E> Default for SingleFlight<K, V, E>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> SingleFlight<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` on behalf of `key`, coalescing with any call already in flight for that key.
    pub fn do_call(&self, key: K, f: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let mut calls = self.calls.lock();
        if let Some(existing) = calls.get(&key).cloned() {
            drop(calls);
            let (call_mutex, condvar) = &*existing;
            let mut call = call_mutex.lock();
            while !call.done {
                condvar.wait(&mut call);
            }
            return call.result.clone().expect("call marked done without a result");
        }

        let shared = Arc::new((
            Mutex::new(Call {
                done: false,
                result: None,
            }),
            Condvar::new(),
        ));
        calls.insert(key.clone(), shared.clone());
        drop(calls);

        let result = f();

        {
            let (call_mutex, condvar) = &*shared;
            let mut call = call_mutex.lock();
            call.result = Some(result.clone());
            call.done = true;
            condvar.notify_all();
        }

        self.calls.lock().remove(&key);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use super::*;

    #[test]
    fn concurrent_calls_for_same_key_run_once() {
        let sf = Arc::new(SingleFlight::<String, i32, String>::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let sf = sf.clone();
                let counter = counter.clone();
                thread::spawn(move || {
                    sf.do_call("x".to_string(), || {
                        counter.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(50));
                        Ok::<i32, String>(42)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(42));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subsequent_calls_after_completion_run_again() {
        let sf = SingleFlight::<String, i32, String>::new();
        let counter = AtomicUsize::new(0);

        let first = sf.do_call("x".to_string(), || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<i32, String>(1)
        });
        let second = sf.do_call("x".to_string(), || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<i32, String>(2)
        });

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn errors_propagate_to_all_waiters() {
        let sf = Arc::new(SingleFlight::<String, i32, String>::new());
        let result = sf.do_call("x".to_string(), || Err::<i32, String>("boom".to_string()));
        assert_eq!(result, Err("boom".to_string()));
    }
}
