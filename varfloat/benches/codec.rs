use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use varfloat::{
    bounded::BoundedIntCodec,
    fixed::{decode_f64_fixed, encode_f64_fixed},
    slice::{decode_floats, encode_floats},
    Config,
};

fn criterion_benchmark(c: &mut Criterion) {
    const DATA: usize = 100_000;

    let values: Vec<f64> = (0..DATA)
        .map(|_| (rand::random::<f64>() - 0.5) * 1e4)
        .collect();
    let ints: Vec<i64> = (0..DATA)
        .map(|_| rand::random::<i64>().rem_euclid(2001) - 1000)
        .collect();

    let mut scalar_group = c.benchmark_group("scalar");
    let g = scalar_group.sample_size(10);
    for bits in [4, 10, 23, 52] {
        let config = Config::new(bits).unwrap();
        g.bench_function(format!("encode_{bits}"), |b| {
            b.iter_batched_ref(
                || Vec::with_capacity(DATA * 4),
                |out| {
                    for &v in &values {
                        config.append(out, black_box(v)).unwrap();
                    }
                },
                BatchSize::LargeInput,
            )
        });

        let mut encoded = Vec::new();
        for &v in &values {
            config.append(&mut encoded, v).unwrap();
        }
        g.bench_function(format!("decode_{bits}"), |b| {
            b.iter(|| {
                let mut offset = 0;
                while offset < encoded.len() {
                    let (v, used) = config.decode(black_box(&encoded[offset..])).unwrap();
                    black_box(v);
                    offset += used;
                }
            })
        });
    }
    g.bench_function("fixed_f64_round_trip", |b| {
        b.iter(|| {
            for &v in &values {
                black_box(decode_f64_fixed(&encode_f64_fixed(black_box(v))).unwrap());
            }
        })
    });
    scalar_group.finish();

    let mut bounded_group = c.benchmark_group("bounded");
    let g = bounded_group.sample_size(10);
    let codec = BoundedIntCodec::auto(-1000, 1000).unwrap();
    g.bench_function("encode_auto", |b| {
        b.iter_batched_ref(
            || Vec::with_capacity(DATA * 3),
            |out| {
                for &n in &ints {
                    codec.append(out, black_box(n)).unwrap();
                }
            },
            BatchSize::LargeInput,
        )
    });
    let mut encoded = Vec::new();
    for &n in &ints {
        codec.append(&mut encoded, n).unwrap();
    }
    g.bench_function("decode_auto", |b| {
        b.iter(|| {
            let mut offset = 0;
            while offset < encoded.len() {
                let (n, used) = codec.decode(black_box(&encoded[offset..])).unwrap();
                black_box(n);
                offset += used;
            }
        })
    });
    bounded_group.finish();

    // Goes through the rayon path when the `parallel` feature is on
    let mut slice_group = c.benchmark_group("slice");
    let g = slice_group.sample_size(10);
    g.bench_function("encode_floats", |b| {
        b.iter(|| black_box(encode_floats(black_box(&values), 12).unwrap()))
    });
    let encoded = encode_floats(&values, 12).unwrap();
    g.bench_function("decode_floats", |b| {
        b.iter(|| black_box(decode_floats(black_box(&encoded), 12).unwrap()))
    });
    slice_group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
