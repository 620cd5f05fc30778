use super::{BuildError, Mode, Phf, Settings};
use alloc::{format, string::String, vec, vec::Vec};

fn synthetic_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("str{i}")).collect()
}

/// Check that the function is injective over `keys` and stays in range.
fn assert_perfect<K: super::KeyUnits>(phf: &Phf, keys: &[K]) {
    let mut seen = vec![false; phf.output_size() as usize];
    for (i, key) in keys.iter().enumerate() {
        let index = phf.evaluate(key);
        assert!(index < phf.output_size(), "key #{i} mapped out of range");
        assert!(!seen[index as usize], "key #{i} collides");
        seen[index as usize] = true;
    }
}

#[cfg(feature = "division")]
fn assert_prime(value: u32) {
    assert!(super::sizing::is_prime(value), "{value} is not prime");
}

#[test]
fn three_keys() {
    let keys = ["a", "b", "c"];
    let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
    assert!(phf.output_size() >= 3);
    assert_eq!(phf.seed(), 31337);
    assert!(!phf.division_mode());
    assert_perfect(&phf, &keys);
}

#[test]
fn empty() {
    let phf = Phf::try_from_keys::<&str>(&[], &Settings::new()).unwrap();
    assert_eq!(phf.bucket_count(), 1);
    assert_eq!(phf.output_size(), 1);
    assert_eq!(phf.max_displacement(), 0);
    assert_eq!(phf.displacement_map(), &[0]);
    // Any key still lands in range
    assert_eq!(phf.evaluate("anything"), 0);
}

#[test]
fn single_key() {
    let phf = Phf::try_from_keys(&["lonely"], &Settings::new()).unwrap();
    assert_eq!(phf.bucket_count(), 1);
    assert_eq!(phf.output_size(), 1);
    assert_eq!(phf.max_displacement(), 1);
    assert_perfect(&phf, &["lonely"]);
}

#[test]
fn build_100k() {
    let keys = synthetic_keys(100_000);
    let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
    assert_eq!(phf.bucket_count(), 32_768);
    assert_eq!(phf.output_size(), 131_072);
    assert_perfect(&phf, &keys);
}

#[test]
fn build_1m() {
    let keys = synthetic_keys(1_000_000);
    let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
    assert_eq!(phf.bucket_count(), 262_144);
    assert_eq!(phf.output_size(), 2_097_152);
    assert_perfect(&phf, &keys);
}

#[test]
fn deterministic() {
    let keys = synthetic_keys(5000);
    let settings = Settings::new().with_seed(12345);
    let first = Phf::try_from_keys(&keys, &settings).unwrap();
    let second = Phf::try_from_keys(&keys, &settings).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.displacement_map(), second.displacement_map());
    for key in &keys {
        assert_eq!(first.evaluate(key), second.evaluate(key));
    }
}

#[test]
fn key_forms_agree() {
    let keys: Vec<String> = ["naïve", "日本語", "😀 emoji", "plain"]
        .iter()
        .map(|&key| key.into())
        .collect();
    let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
    for key in &keys {
        let units: Vec<u16> = key.encode_utf16().collect();
        assert_eq!(phf.evaluate(key.as_str()), phf.evaluate(key));
        assert_eq!(phf.evaluate(&units[..]), phf.evaluate(key));
    }
    assert_perfect(&phf, &keys);
}

#[test]
fn duplicates_rejected() {
    assert_eq!(
        Phf::try_from_keys(&["x", "x"], &Settings::new()),
        Err(BuildError::DuplicateKey {
            first: 0,
            second: 1
        }),
    );

    let mut keys = synthetic_keys(1000);
    keys.push(String::from("str500"));
    assert_eq!(
        Phf::try_from_keys(&keys, &Settings::new()),
        Err(BuildError::DuplicateKey {
            first: 500,
            second: 1000
        }),
    );
}

#[test]
#[should_panic(expected = "keys #0 and #1 are equal")]
fn from_keys_panics_on_duplicates() {
    let _ = Phf::from_keys(&["x", "x"], &Settings::new());
}

#[test]
fn limit_exceeded() {
    // Everything in one bucket, every slot taken: the bucket can never be placed
    let keys = synthetic_keys(64);
    let settings = Settings::new()
        .with_items_per_bucket(64)
        .with_alpha(100)
        .with_displacement_limit(3);
    match Phf::try_from_keys(&keys, &settings) {
        Err(BuildError::DisplacementLimitExceeded { bucket: 0, limit: 3 }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn tighter_alpha_packs_tighter() {
    let keys = synthetic_keys(3000);
    let loose = Phf::try_from_keys(&keys, &Settings::new().with_alpha(80)).unwrap();
    let tight = Phf::try_from_keys(&keys, &Settings::new().with_alpha(100)).unwrap();
    assert!(tight.output_size() <= loose.output_size());
    assert_eq!(loose.output_size(), 4096);
    assert_eq!(tight.output_size(), 4096);
    assert_perfect(&loose, &keys);
    assert_perfect(&tight, &keys);

    let keys = synthetic_keys(1000);
    let loose = Phf::try_from_keys(&keys, &Settings::new().with_alpha(80)).unwrap();
    let tight = Phf::try_from_keys(&keys, &Settings::new().with_alpha(100)).unwrap();
    assert_eq!(loose.output_size(), 2048);
    assert_eq!(tight.output_size(), 1024);
    assert_perfect(&tight, &keys);
}

#[test]
fn zero_settings_are_clamped() {
    let keys = synthetic_keys(100);
    let settings = Settings::new().with_items_per_bucket(0).with_alpha(0);
    let phf = Phf::try_from_keys(&keys, &settings).unwrap();
    // One key per bucket, 100x oversized output
    assert_eq!(phf.bucket_count(), 128);
    assert_eq!(phf.output_size(), 16_384);
    assert_perfect(&phf, &keys);
}

#[test]
fn power_of_two_sizes() {
    for n in [1, 2, 3, 7, 100, 1000, 4097] {
        let keys = synthetic_keys(n);
        let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
        assert_eq!(phf.mode(), Mode::Bitmask);
        assert!(phf.bucket_count().is_power_of_two());
        assert!(phf.output_size().is_power_of_two());
        assert_eq!(phf.displacement_map().len(), phf.bucket_count() as usize);
        assert_perfect(&phf, &keys);
    }
}

#[test]
fn max_displacement_matches_map() {
    for n in [1, 10, 1000, 20_000] {
        let keys = synthetic_keys(n);
        let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
        assert!(phf.max_displacement() >= 1);
        assert_eq!(
            phf.max_displacement(),
            phf.displacement_map().iter().copied().max().unwrap(),
        );
    }
}

#[cfg(feature = "division")]
mod prime_modulo {
    use super::*;

    #[test]
    fn prime_sizes() {
        for n in [0, 1, 2, 3, 7, 100, 1000, 4097] {
            let keys = synthetic_keys(n);
            let settings = Settings::new().with_division_mode(true);
            let phf = Phf::try_from_keys(&keys, &settings).unwrap();
            assert!(phf.division_mode());
            assert_eq!(phf.mode(), Mode::Modulo);
            assert_prime(phf.bucket_count());
            assert_prime(phf.output_size());
            assert_perfect(&phf, &keys);
        }
    }

    #[test]
    fn exact_sizes() {
        let keys = synthetic_keys(1000);
        let settings = Settings::new().with_division_mode(true);
        let phf = Phf::try_from_keys(&keys, &settings).unwrap();
        assert_eq!(phf.bucket_count(), 251);
        assert_eq!(phf.output_size(), 1259);

        let empty = Phf::try_from_keys::<&str>(&[], &settings).unwrap();
        assert_eq!(empty.bucket_count(), 2);
        assert_eq!(empty.output_size(), 2);
    }

    #[test]
    fn bucket_count_truncates() {
        // 10 / 4 keys per bucket rounds down to 2, which is already prime
        let keys = synthetic_keys(10);
        let phf = Phf::try_from_keys(&keys, &Settings::new().with_division_mode(true)).unwrap();
        assert_eq!(phf.bucket_count(), 2);
        assert_eq!(phf.output_size(), 13);
        assert_perfect(&phf, &keys);
    }

    #[test]
    fn modulo_build_100k() {
        let keys = synthetic_keys(100_000);
        let settings = Settings::new().with_division_mode(true).with_alpha(95);
        let phf = Phf::try_from_keys(&keys, &settings).unwrap();
        assert_perfect(&phf, &keys);
    }
}

#[cfg(not(feature = "division"))]
#[test]
fn division_unsupported() {
    assert_eq!(
        Phf::try_from_keys(&["a"], &Settings::new().with_division_mode(true)),
        Err(BuildError::UnsupportedConfiguration { mode: Mode::Modulo }),
    );
}

#[cfg(feature = "serde")]
mod persistence {
    use super::*;
    use crate::ValidationError;

    fn to_cbor<T: serde::Serialize>(value: &T) -> Vec<u8> {
        let mut bytes = Vec::new();
        ciborium::into_writer(value, &mut bytes).unwrap();
        bytes
    }

    fn from_cbor(bytes: &[u8]) -> Result<Phf, String> {
        ciborium::from_reader(bytes).map_err(|error| format!("{error}"))
    }

    /// The persisted layout, with every field under test control.
    #[derive(serde::Serialize)]
    struct Raw<'a> {
        seed: u32,
        division_mode: bool,
        bucket_count: u32,
        output_size: u32,
        displacements: &'a [u32],
        max_displacement: u32,
    }

    impl Default for Raw<'_> {
        fn default() -> Self {
            Self {
                seed: 31337,
                division_mode: false,
                bucket_count: 2,
                output_size: 8,
                displacements: &[1, 3],
                max_displacement: 3,
            }
        }
    }

    fn rejected(raw: &Raw<'_>, error: ValidationError) {
        let message = from_cbor(&to_cbor(raw)).unwrap_err();
        assert!(message.contains(&format!("{error}")), "{message}");
    }

    #[test]
    fn round_trip() {
        let keys = synthetic_keys(2000);
        let phf = Phf::try_from_keys(&keys, &Settings::new().with_seed(99)).unwrap();
        let restored = from_cbor(&to_cbor(&phf)).unwrap();
        assert_eq!(restored, phf);
        for key in &keys {
            assert_eq!(restored.evaluate(key), phf.evaluate(key));
        }
    }

    #[cfg(feature = "division")]
    #[test]
    fn round_trip_division() {
        let keys = synthetic_keys(500);
        let phf = Phf::try_from_keys(&keys, &Settings::new().with_division_mode(true)).unwrap();
        assert_eq!(from_cbor(&to_cbor(&phf)).unwrap(), phf);
    }

    #[test]
    fn valid_raw_data() {
        let phf = from_cbor(&to_cbor(&Raw::default())).unwrap();
        assert_eq!(phf.bucket_count(), 2);
        assert_eq!(phf.output_size(), 8);
        assert_eq!(phf.displacement_map(), &[1, 3]);
        assert!(phf.evaluate("key") < 8);
    }

    #[test]
    fn validation() {
        rejected(
            &Raw {
                bucket_count: 0,
                displacements: &[],
                max_displacement: 0,
                ..Raw::default()
            },
            ValidationError::ZeroSize,
        );
        rejected(
            &Raw {
                output_size: 12,
                ..Raw::default()
            },
            ValidationError::NotPowerOfTwo(12),
        );
        rejected(
            &Raw {
                displacements: &[1, 3, 0],
                ..Raw::default()
            },
            ValidationError::WrongDisplacementCount {
                expected: 2,
                actual: 3,
            },
        );
        rejected(
            &Raw {
                max_displacement: 7,
                ..Raw::default()
            },
            ValidationError::WrongMaxDisplacement {
                stored: 7,
                actual: 3,
            },
        );
    }

    #[cfg(feature = "division")]
    #[test]
    fn validation_division() {
        rejected(
            &Raw {
                division_mode: true,
                bucket_count: 2,
                output_size: 9,
                ..Raw::default()
            },
            ValidationError::NotPrime(9),
        );
        let phf = from_cbor(&to_cbor(&Raw {
            division_mode: true,
            bucket_count: 2,
            output_size: 11,
            ..Raw::default()
        }))
        .unwrap();
        assert!(phf.evaluate("key") < 11);
    }
}

#[cfg(feature = "codegen")]
mod generated_code {
    use super::*;
    use crate::codegen::CodeGenerator;
    use alloc::string::ToString;

    #[test]
    fn raw_parts() {
        let keys = synthetic_keys(10);
        let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
        let code = CodeGenerator::new().generate(&phf).to_string();

        assert!(code.contains("use :: chd :: Phf as __Phf ;"), "{code}");
        assert!(
            code.contains("use :: chd :: low_level :: Displacements as __Displacements ;"),
            "{code}"
        );
        let map: Vec<String> = phf.displacement_map().iter().map(u32::to_string).collect();
        let expected = format!(
            "__Phf :: __from_raw_parts (31337 , false , {} , {} , __Displacements :: from_static \
             (& [{}]) , {} ,)",
            phf.bucket_count(),
            phf.output_size(),
            map.join(" , "),
            phf.max_displacement(),
        );
        assert!(code.contains(&expected), "{code}");
    }

    #[test]
    fn raw_parts_reconstruct() {
        let keys = synthetic_keys(300);
        let phf = Phf::try_from_keys(&keys, &Settings::new()).unwrap();
        let map: &'static [u32] = phf.displacement_map().to_vec().leak();
        let rebuilt = Phf::__from_raw_parts(
            phf.seed(),
            phf.division_mode(),
            phf.bucket_count(),
            phf.output_size(),
            crate::low_level::Displacements::from_static(map),
            phf.max_displacement(),
        );
        assert_eq!(rebuilt, phf);
        assert_perfect(&rebuilt, &keys);
    }
}
