use std::sync::Arc;

use search_space::{
    ErrKind, ResNetSpace, SearchSpace, SearchSpaceErr, SpaceConfig,
    graph::{Fc, LayerSpec, Recorder, Shape, ShapeTracer},
    init::ParamInit,
};

fn space(block_num: usize) -> ResNetSpace {
    ResNetSpace::new(&SpaceConfig::new(Some(224), Some(1), block_num)).unwrap()
}

/// Every token vector within `range_table`, in lexicographic order.
fn all_tokens(range_table: &[usize]) -> Vec<Vec<usize>> {
    range_table.iter().fold(vec![vec![]], |acc, &bound| {
        acc.into_iter()
            .flat_map(|prefix| {
                (0..bound).map(move |token| {
                    let mut tokens = prefix.clone();
                    tokens.push(token);
                    tokens
                })
            })
            .collect()
    })
}

fn conv1_strides(layers: &[LayerSpec]) -> Vec<(String, usize)> {
    layers
        .iter()
        .filter_map(|layer| match layer {
            LayerSpec::ConvBn(conv) if conv.name.ends_with("_bottleneck_conv1") => {
                Some((conv.name.clone(), conv.stride))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn range_table_length() {
    for block_num in 1..=4 {
        assert_eq!(space(block_num).range_table().len(), 2 * block_num);
    }
}

#[test]
fn init_tokens_are_zero_and_decode() {
    for block_num in 1..=4 {
        let space = space(block_num);
        let tokens = space.init_tokens();

        assert_eq!(tokens.len(), space.range_table().len());
        assert!(tokens.iter().all(|&t| t == 0));
        assert!(space.token_to_arch(Some(&tokens)).is_ok());
        assert!(space.token_to_arch(None).is_ok());
    }
}

#[test]
fn every_valid_token_vector_builds() {
    for block_num in 1..=2 {
        let space = space(block_num);

        for tokens in all_tokens(&space.range_table()) {
            let arch = space.token_to_arch(Some(&tokens)).unwrap();
            let mut tracer = ShapeTracer::new();
            let out = arch.build(&mut tracer, Shape::image(3, 224)).unwrap();
            assert_eq!(out, Shape::new(1000, 1, 1));
        }
    }
}

#[test]
fn sampled_token_vectors_build() {
    use rand::{SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(11);
    for block_num in 3..=4 {
        let space = space(block_num);

        for _ in 0..50 {
            let tokens = search_space::sample_tokens(&space.range_table(), &mut rng);
            let arch = space.token_to_arch(Some(&tokens)).unwrap();
            let mut tracer = ShapeTracer::new();
            assert!(arch.build(&mut tracer, Shape::image(3, 224)).is_ok());
        }
    }
}

#[test]
fn decoding_is_idempotent() {
    let space = space(4);
    let tokens = [3, 1, 4, 1, 5, 9, 2, 5];

    let a = space.token_to_arch(Some(&tokens)).unwrap();
    let b = space.token_to_arch(Some(&tokens)).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.layers(), b.layers());
}

#[test]
fn only_first_repeat_of_later_stages_downsamples() {
    let space = space(3);
    // repeat counts 3, 4 and 5
    let arch = space.token_to_arch(Some(&[0, 1, 0, 2, 0, 3])).unwrap();

    let mut recorder = Recorder::new();
    let input = recorder.input();
    arch.build(&mut recorder, input).unwrap();

    let strides = conv1_strides(&recorder.layers());
    assert_eq!(strides.len(), 3 + 4 + 5);

    for (name, stride) in strides {
        let downsamples = name == "resnet_depth0_block1_bottleneck_conv1"
            || name == "resnet_depth0_block2_bottleneck_conv1";
        assert_eq!(stride, if downsamples { 2 } else { 1 }, "{name}");
    }

    let plan = arch.as_resnet().unwrap();
    let block_strides: Vec<_> = plan.blocks().iter().map(|b| b.stride).collect();
    assert_eq!(block_strides, vec![1, 1, 1, 2, 1, 1, 1, 2, 1, 1, 1, 1]);
}

#[test]
fn largest_token_vector() {
    let space = space(4);
    let tokens = [6, 4, 6, 5, 5, 12, 4, 5];

    let arch = space.token_to_arch(Some(&tokens)).unwrap();
    let plan = arch.as_resnet().unwrap();
    let stages: Vec<_> = plan.stages().iter().map(|s| (s.width, s.depth)).collect();
    assert_eq!(stages, vec![(224, 6), (320, 7), (384, 24), (640, 7)]);
    assert_eq!(plan.num_blocks(), 44);

    let mut recorder = Recorder::new();
    let input = recorder.input();
    arch.build(&mut recorder, input).unwrap();

    let layers = recorder.layers();
    let adds = layers
        .iter()
        .filter(|layer| matches!(layer, LayerSpec::Add(_)))
        .count();
    assert_eq!(adds, 44);
    assert_eq!(layers[0].name(), "resnet_conv0");
    assert_eq!(
        layers
            .iter()
            .filter(|layer| layer.name() == "resnet_conv0")
            .count(),
        1
    );

    let mut tracer = ShapeTracer::new();
    let out = arch.build(&mut tracer, Shape::image(3, 224)).unwrap();
    assert_eq!(out, Shape::new(1000, 1, 1));
}

#[test]
fn classifier_head() {
    let config = SpaceConfig::new(Some(224), Some(1), 2).with_class_dim(37);
    let space = ResNetSpace::new(&config).unwrap();
    let arch = space.token_to_arch(None).unwrap();

    let expected = LayerSpec::Fc(Fc {
        name: "resnet_fc".to_string(),
        size: 37,
        weight_init: ParamInit::Normal {
            mean: 0.,
            std_dev: 0.01,
        },
        bias_init: ParamInit::Const { value: 0. },
    });

    assert_eq!(arch.layers().last(), Some(&expected));

    let mut recorder = Recorder::new();
    let input = recorder.input();
    arch.build(&mut recorder, input).unwrap();
    assert_eq!(recorder.layers().last(), Some(&expected));

    let features = ResNetSpace::new(&config.with_extract_feature(true)).unwrap();
    let layers = features.token_to_arch(None).unwrap().layers();
    assert!(!layers.iter().any(|layer| matches!(layer, LayerSpec::Fc(_))));
}

#[test]
fn too_many_stages() {
    let err = ResNetSpace::new(&SpaceConfig::new(Some(224), Some(1), 5)).unwrap_err();
    assert_eq!(err, SearchSpaceErr::BlockNumOutOfRange { got: 5, max: 4 });
    assert_eq!(err.kind(), ErrKind::Configuration);
}

#[test]
fn block_mask_is_rejected() {
    let config = SpaceConfig::new(Some(224), Some(1), 2).with_block_mask(vec![1, 0]);
    let err = ResNetSpace::new(&config).unwrap_err();
    assert_eq!(err.kind(), ErrKind::Configuration);
}

#[test]
fn invalid_tokens_fail_before_building() {
    let space = space(1);
    let cases: [&[usize]; 4] = [&[7, 0], &[0, 5], &[0], &[0, 0, 0]];

    for tokens in cases {
        let mut recorder = Recorder::new();
        let input = recorder.input();

        let err = match space.token_to_arch(Some(tokens)) {
            Ok(arch) => {
                arch.build(&mut recorder, input).unwrap();
                panic!("{tokens:?} decoded");
            }
            Err(err) => err,
        };

        assert_eq!(err.kind(), ErrKind::TokenRange);
        assert!(recorder.is_empty());
    }

    assert_eq!(
        space.token_to_arch(Some(&[7, 0])).unwrap_err(),
        SearchSpaceErr::TokenOutOfRange {
            position: 0,
            token: 7,
            bound: 7
        }
    );
}

#[test]
fn concurrent_decoding() {
    let space = Arc::new(space(4));
    let tokens = [6, 4, 6, 5, 5, 12, 4, 5];
    let expected = space.token_to_arch(Some(&tokens)).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let space = Arc::clone(&space);
                s.spawn(move || space.token_to_arch(Some(&tokens)).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
