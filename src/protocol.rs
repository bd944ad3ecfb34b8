//! Wire protocol served to peers and operators.
//!
//! The mix exchange is carried by four requests. `arg` and `diff` payloads are
//! opaque byte strings produced and consumed by the mixable adapter; only
//! their length is ever inspected by the mixer.

/// Argument bytes describing what the requester already has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pull {
    pub arg: Vec<u8>,
}

/// The responder's serialized descriptor request (the integer is ignored).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPullArgument {
    pub dummy: i32,
}

/// Diff bytes to be applied to the responder's model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Push {
    pub diff: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Message)]
#[rtype(result = "Response")]
pub enum Request {
    Pull(Pull),
    GetPullArgument(GetPullArgument),
    Push(Push),
    DoMix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullAck {
    pub diff: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullArgumentAck {
    pub arg: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushAck {
    pub code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixAck {
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    PullAck(PullAck),
    PullArgumentAck(PullArgumentAck),
    PushAck(PushAck),
    MixAck(MixAck),
    // Error
    Unknown,
}
