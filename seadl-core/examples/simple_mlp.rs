use rand::rngs::StdRng;
use rand::SeedableRng;
use seadl_core::nn::{describe, init, Conv2d, Conv2dConfig, Flatten, Linear, LinearConfig, ReLU};
use seadl_core::{DType, Device, Module, SeaDlError, Sequential, SimpleMLP, SimpleMlpConfig};

// Fits a small SimpleMLP to y = sum(x) with plain gradient descent, then
// runs a batch of fake images through a conv stack.
fn main() -> Result<(), SeaDlError> {
    env_logger::init();

    let device = Device::Cpu;
    let mut rng = StdRng::seed_from_u64(42);

    // --- MLP regression ---
    let mlp = SimpleMLP::new_with_rng(
        SimpleMlpConfig::default()
            .with_features(8, 32, 1)
            .with_device(device.clone()),
        &mut rng,
    )?;
    println!("{}", describe(&mlp));
    println!("Parameters: {}", mlp.num_parameters());

    let x = init::uniform(-1.0, 1.0, &[64, 8], DType::F32, &device, &mut rng)?;
    let y = x.sum_keepdim(1)?;
    let learning_rate = 0.05;

    for epoch in 0..100 {
        let loss = mlp.forward(&x)?.sub(&y)?.sqr()?.mean_all()?;
        let grads = loss.backward()?;
        for param in mlp.parameters() {
            if let Some(grad) = grads.get(param.tensor()) {
                param.set(&param.tensor().sub(&grad.affine(learning_rate, 0.0)?)?)?;
            }
        }
        if epoch % 20 == 0 {
            println!("Epoch {:3}: loss = {:.6}", epoch, loss.to_scalar::<f32>()?);
        }
    }

    // --- Convolution stack ---
    let conv_config = Conv2dConfig::default().with_device(device.clone());
    let convnet = Sequential::new()
        .with(Conv2d::new_with_rng(1, 4, 3, conv_config.clone().with_padding(1), &mut rng)?)?
        .with(ReLU::new())?
        .with(Conv2d::new_with_rng(4, 8, 3, conv_config.with_stride(2), &mut rng)?)?
        .with(ReLU::new())?
        .with(Flatten::default())?
        .with(Linear::new_with_rng(
            8 * 13 * 13,
            10,
            LinearConfig::default().with_device(device.clone()),
            &mut rng,
        )?)?;
    println!("{}", describe(&convnet));

    let images = init::uniform(0.0, 1.0, &[16, 1, 28, 28], DType::F32, &device, &mut rng)?;
    let logits = convnet.forward(&images)?;
    println!("Conv stack output shape: {:?}", logits.dims());
    Ok(())
}
