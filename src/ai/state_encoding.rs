use burn::prelude::*;
use burn::tensor::TensorData;

use crate::game::{MatchState, StateVector, FEATURE_SIZE};

/// Encode one feature vector as a `[1, 31]` tensor.
pub fn encode_features<B: Backend>(features: &StateVector, device: &B::Device) -> Tensor<B, 2> {
    Tensor::<B, 1>::from_data(TensorData::from(features.as_slice()), device)
        .reshape([1, FEATURE_SIZE as i32])
}

/// Encode a match as a `[1, 31]` tensor.
pub fn encode_state<B: Backend>(state: &MatchState, device: &B::Device) -> Tensor<B, 2> {
    encode_features(&state.encode(), device)
}

/// Encode many feature vectors as a `[batch, 31]` tensor.
pub fn encode_batch<B: Backend>(batch: &[StateVector], device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = batch.iter().flat_map(|v| v.iter().copied()).collect();
    Tensor::<B, 1>::from_data(TensorData::from(flat.as_slice()), device)
        .reshape([batch.len() as i32, FEATURE_SIZE as i32])
}

/// Pull every element of an f32 tensor back to the host.
pub fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor
        .into_data()
        .to_vec::<f32>()
        .expect("approximator tensors hold f32 elements")
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_encode_state_shape_and_values() {
        let state = MatchState::new(&mut StdRng::seed_from_u64(3));
        let device = Default::default();
        let tensor = encode_state::<TestBackend>(&state, &device);
        assert_eq!(tensor.shape().dims, [1, FEATURE_SIZE]);
        let data = to_vec(tensor);
        assert_eq!(data.as_slice(), state.encode().as_slice());
    }

    #[test]
    fn test_encode_batch() {
        let mut rng = StdRng::seed_from_u64(4);
        let s1 = MatchState::new(&mut rng);
        let s2 = s1.after(&s1.legal_actions()[0]).unwrap();
        let device = Default::default();
        let batch = encode_batch::<TestBackend>(&[s1.encode(), s2.encode()], &device);
        assert_eq!(batch.shape().dims, [2, FEATURE_SIZE]);
        let data = to_vec(batch);
        assert_eq!(&data[FEATURE_SIZE..], s2.encode().as_slice());
    }
}
