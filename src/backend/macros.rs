/// Expands to the correct `build_stream::<T>(…)` call for the device's
/// sample format.
///
/// Usage:
/// `build_stream_expansion!(sample_format, device, stream_config, pipe)`
macro_rules! build_stream_expansion {
    ($sample_format:expr, $device:expr, $config:expr, $pipe:expr) => {{
        match $sample_format {
            cpal::SampleFormat::I8 => build_stream::<i8>($device, $config, $pipe),
            cpal::SampleFormat::I16 => build_stream::<i16>($device, $config, $pipe),
            cpal::SampleFormat::I32 => build_stream::<i32>($device, $config, $pipe),
            cpal::SampleFormat::I64 => build_stream::<i64>($device, $config, $pipe),
            cpal::SampleFormat::U8 => build_stream::<u8>($device, $config, $pipe),
            cpal::SampleFormat::U16 => build_stream::<u16>($device, $config, $pipe),
            cpal::SampleFormat::U32 => build_stream::<u32>($device, $config, $pipe),
            cpal::SampleFormat::U64 => build_stream::<u64>($device, $config, $pipe),
            cpal::SampleFormat::F32 => build_stream::<f32>($device, $config, $pipe),
            cpal::SampleFormat::F64 => build_stream::<f64>($device, $config, $pipe),
            sf => {
                tracing::error!("Unsupported sample format '{sf:?}'");
                Err(AcquireError::NotSupported("sample format"))
            }
        }
    }};
}

pub(crate) use build_stream_expansion;
