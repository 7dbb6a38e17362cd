// Generated TensorFlow graph messages.
#[allow(clippy::all)]
pub mod tensorflow {
    include!(concat!(env!("OUT_DIR"), "/tensorflow.rs"));
}
