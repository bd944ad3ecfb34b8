//! The bridge between the mixer and the node's model.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::Result;

/// Interface the node's model exposes to the mixer.
///
/// Payloads are opaque byte strings; their shape is chosen by the model and
/// must be identical across peers of the same cluster. Thread safety is
/// provided by the caller through the model readers-writer lock held by
/// [MixableHandle].
pub trait Mixable: Send + Sync {
    /// Serializes a descriptor of the local state ("what I already have").
    fn get_argument(&self) -> Result<Vec<u8>>;

    /// Computes the diff a remote peer should receive, given the remote's
    /// argument.
    fn pull(&self, arg: &[u8]) -> Result<Vec<u8>>;

    /// Applies a peer-produced diff to the local model.
    fn push(&mut self, diff: &[u8]) -> Result<()>;
}

/// Clonable handle holding the model behind its readers-writer lock.
///
/// `get_argument` and `pull` run under the read guard, `push` under the write
/// guard. The guard is released before the handle returns, so the model lock
/// is never held across a peer RPC.
#[derive(Clone)]
pub struct MixableHandle {
    model: Arc<RwLock<Box<dyn Mixable>>>,
}

impl MixableHandle {
    pub fn new(model: Box<dyn Mixable>) -> Self {
        MixableHandle { model: Arc::new(RwLock::new(model)) }
    }

    pub async fn get_argument(&self) -> Result<Vec<u8>> {
        let model = self.model.read().await;
        model.get_argument()
    }

    pub async fn pull(&self, arg: &[u8]) -> Result<Vec<u8>> {
        let model = self.model.read().await;
        model.pull(arg)
    }

    pub async fn push(&self, diff: &[u8]) -> Result<()> {
        let mut model = self.model.write().await;
        model.push(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingModel {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Mixable for RecordingModel {
        fn get_argument(&self) -> Result<Vec<u8>> {
            self.log.lock().unwrap().push("get_argument".to_owned());
            Ok(b"arg".to_vec())
        }

        fn pull(&self, arg: &[u8]) -> Result<Vec<u8>> {
            self.log.lock().unwrap().push(format!("pull:{:?}", arg));
            Ok(b"diff".to_vec())
        }

        fn push(&mut self, diff: &[u8]) -> Result<()> {
            self.log.lock().unwrap().push(format!("push:{:?}", diff));
            Ok(())
        }
    }

    #[actix_rt::test]
    async fn test_handle_dispatches_to_model() {
        let log = Arc::new(Mutex::new(vec![]));
        let handle = MixableHandle::new(Box::new(RecordingModel { log: log.clone() }));

        assert_eq!(handle.get_argument().await.unwrap(), b"arg".to_vec());
        assert_eq!(handle.pull(b"a").await.unwrap(), b"diff".to_vec());
        handle.push(b"d").await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(*log, vec!["get_argument", "pull:[97]", "push:[100]"]);
    }

    #[actix_rt::test]
    async fn test_concurrent_readers() {
        let log = Arc::new(Mutex::new(vec![]));
        let handle = MixableHandle::new(Box::new(RecordingModel { log }));

        // Two reads may be in flight at once; a write interleaves cleanly.
        let h1 = handle.clone();
        let h2 = handle.clone();
        let (a, b) = tokio::join!(h1.get_argument(), h2.pull(b"x"));
        a.unwrap();
        b.unwrap();
        handle.push(b"y").await.unwrap();
    }
}
