use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use machine_indexer::parsers::{MachineStream, collect_prefixes};

/// Generate a synthetic detail document; every fourth machine is a device
fn generate_detail_xml(num_machines: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<mame build=\"0.261\">\n");
    for i in 0..num_machines {
        let device = if i % 4 == 0 { " isdevice=\"yes\" runnable=\"no\"" } else { "" };
        xml.push_str(&format!(
            "\t<machine name=\"game{i}\" sourcefile=\"game.cpp\"{device}>\n\
             \t\t<description>Game number {i} (World, rev. A)</description>\n\
             \t\t<year>19{:02}</year>\n\
             \t\t<manufacturer>Manufacturer {}</manufacturer>\n\
             \t\t<rom name=\"game{i}.1a\" size=\"4096\" crc=\"00000000\"/>\n\
             \t\t<chip type=\"cpu\" tag=\"maincpu\" name=\"Zilog Z80\" clock=\"3072000\"/>\n\
             \t\t<driver status=\"good\" emulation=\"good\" savestate=\"supported\"/>\n\
             \t</machine>\n",
            i % 100,
            i % 37,
        ));
    }
    xml.push_str("</mame>\n");
    xml
}

/// Generate a synthetic `-ll` listing
fn generate_listing(num_names: usize) -> String {
    let mut listing = String::from("Name:             Description:\n");
    for i in 0..num_names {
        let first = (b'a' + (i % 26) as u8) as char;
        let second = (b'a' + ((i / 26) % 26) as u8) as char;
        listing.push_str(&format!("{}{}game{:<10}\"Game {}\"\n", first, second, i, i));
    }
    listing
}

fn bench_decode_machines(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_machines");

    for size in [100, 1_000, 10_000].iter() {
        let xml = generate_detail_xml(*size);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| {
                let stream = MachineStream::new(Cursor::new(black_box(xml.as_bytes())), "bench*");
                stream.filter(|r| r.is_ok()).count()
            });
        });
    }

    group.finish();
}

fn bench_collect_prefixes(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_prefixes");

    for size in [1_000, 40_000].iter() {
        let listing = generate_listing(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &listing, |b, listing| {
            b.iter(|| collect_prefixes(Cursor::new(black_box(listing.as_bytes())), 2));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_machines, bench_collect_prefixes);
criterion_main!(benches);
