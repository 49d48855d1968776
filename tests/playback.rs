//! MP3 decode tests
//!
//! Built around a hand-assembled silent MPEG-1 Layer III stream so no
//! audio assets or hardware are needed.

use devimitra::voice::decode_mp3;

/// One silent MPEG-1 Layer III frame: 128 kbps, 44.1 kHz, mono.
///
/// Header 0xFF 0xFB 0x90 0xC4, then a zeroed body; zeroed side info means
/// no Huffman data, which decodes to a full frame of silence. Frame length
/// is 144 * 128000 / 44100 = 417 bytes.
fn silent_frame_44k() -> Vec<u8> {
    let mut frame = vec![0xFF, 0xFB, 0x90, 0xC4];
    frame.resize(417, 0x00);
    frame
}

#[test]
fn decode_keeps_the_native_sample_rate() {
    let mut data = Vec::new();
    for _ in 0..3 {
        data.extend(silent_frame_44k());
    }

    let clip = decode_mp3(&data).unwrap();

    // The synthesis service returns 44.1 kHz MP3 by default; playback must
    // see that rate, not assume its own
    assert_eq!(clip.sample_rate, 44100);
    assert!(!clip.samples.is_empty());
}

#[test]
fn decoded_silence_stays_silent() {
    let mut data = Vec::new();
    for _ in 0..2 {
        data.extend(silent_frame_44k());
    }

    let clip = decode_mp3(&data).unwrap();

    assert!(clip.samples.iter().all(|s| s.abs() < 1e-3));
}

#[test]
fn empty_input_is_an_error() {
    assert!(decode_mp3(&[]).is_err());
}
