use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use softbridge_deliveries::{AssemblyRequest, Deliveries, DocumentIndex, DocumentKind};
use softbridge_infra::testing::{InMemoryTextResolver, ScriptedExecutor, in_list_values};
use softbridge_infra::{ErpConfig, OrderTexts, Row, StaticReferenceResolver};

fn header(record_no: u32) -> Row {
    Row::new("ALK00")
        .with("satznr", record_no)
        .with("auftragsnr", 1_000_000 + record_no)
        .with("ALK_lieferschein", NaiveDate::from_ymd_opt(2010, 12, 21).unwrap())
        .with("rechnungsempfaenger", 17200)
        .with("warenempfaenger", 17300)
        .with("lager", 1)
        .with("kommibelegnr", 3_000_000 + record_no)
        .with("lieferscheinnr", 4_000_000 + record_no)
}

fn position(header: u32, pos: u32) -> Row {
    Row::new("ALN00")
        .with("satznr_kopf", header)
        .with("auftragsnr", 1_000_000 + header)
        .with("auftrags_position", pos)
        .with("kommibelegnr", 3_000_000 + header)
        .with("kommibeleg_position", pos)
        .with("artnr", "14600")
        .with("menge", 5)
        .with("sachbearbeiter_bearbeitung", "mmueller")
}

fn backend(headers: u32, positions: u32) -> ScriptedExecutor {
    let header_rows: Vec<Row> = (1..=headers).map(header).collect();
    ScriptedExecutor::new(move |q| {
        Ok(match q.primary_table() {
            "ALK00" => header_rows.clone(),
            "ALN00" => in_list_values(q.condition.as_deref().unwrap_or_default(), "LNSANK")
                .iter()
                .filter_map(|k| k.parse::<u32>().ok())
                .flat_map(|k| (1..=positions).map(move |p| position(k, p)))
                .collect(),
            _ => Vec::new(),
        })
    })
}

/// Full assembly against a scripted backend, 4 positions per document.
fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_delivery_notes");
    let refs = StaticReferenceResolver::default();
    let texts = InMemoryTextResolver::new(OrderTexts::default());

    for headers in [10u32, 50, 200, 1000] {
        let exec = backend(headers, 4);
        let deliveries = Deliveries::new(&exec, &texts, &refs, &ErpConfig::default());
        let request = AssemblyRequest::new(DocumentKind::DeliveryNote);

        group.throughput(Throughput::Elements(headers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(headers), &headers, |b, _| {
            b.iter(|| black_box(deliveries.assemble(black_box(&request)).unwrap()));
        });
    }
    group.finish();
}

/// Header indexing alone, without any backend round trips.
fn bench_index_headers(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_headers");
    let refs = StaticReferenceResolver::default();

    for headers in [100u32, 1000, 5000] {
        let rows: Vec<Row> = (1..=headers).map(header).collect();
        group.throughput(Throughput::Elements(headers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(headers), &rows, |b, rows| {
            b.iter(|| black_box(DocumentIndex::from_header_rows(black_box(rows), &refs).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assemble, bench_index_headers);
criterion_main!(benches);
