use comp40::{array2::PlainArray2, Pixmap, Rgb};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [(usize, usize); 3] = [(64, 64), (640, 480), (1920, 1080)];

fn synthetic(width: usize, height: usize) -> Pixmap {
    let pixels = PlainArray2::from_fn(width, height, |col, row| {
        let noise = (col * 7919 + row * 104_729) % 31;
        Rgb::new(
            ((col * 255 / width + noise) % 256) as u16,
            ((row * 255 / height + noise) % 256) as u16,
            (((col + row) * 255 / (width + height) + noise) % 256) as u16,
        )
    });
    Pixmap::from_pixels(pixels, 255).unwrap()
}

fn compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthetic compress");

    for (width, height) in SIZES {
        let image = synthetic(width, height);
        let name = format!("{width}x{height}");

        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("compress_to_vec", &name),
            &image,
            |b, image| {
                let mut encoded = Vec::with_capacity(width * height + 64);
                b.iter(|| {
                    encoded.clear();
                    comp40::compress_to_vec(image, &mut encoded)
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("compress_std", &name), &image, |b, image| {
            let mut encoded = Vec::with_capacity(width * height + 64);
            b.iter(|| {
                encoded.clear();
                comp40::compress(image, &mut encoded)
            })
        });
    }
}

fn decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthetic decompress");

    for (width, height) in SIZES {
        let mut encoded = Vec::new();
        comp40::compress_to_vec(&synthetic(width, height), &mut encoded).unwrap();
        let name = format!("{width}x{height}");

        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(BenchmarkId::new("decompress", &name), &encoded, |b, input| {
            b.iter(|| comp40::decompress(input))
        });
    }
}

criterion_group!(benches, compress, decompress);
criterion_main!(benches);
