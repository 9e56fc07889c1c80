use chrono::{FixedOffset, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use horary::aspects::AspectCalculator;
use horary::chart::{ChartBuilder, ChartMoment, PositionsOnly, SkyContext, StationTable};
use horary::ephemeris::{datetime_to_julian_day, BodyPosition, GeoLocation, HouseFrame};
use horary::judgment::{JudgmentOverrides, JudgmentPipeline};
use horary::question::{KeywordClassifier, QuestionClassifier};
use horary_config::HorarySettings;

fn moment() -> ChartMoment {
    let utc = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
    ChartMoment {
        local: utc.with_timezone(&FixedOffset::east_opt(0).unwrap()),
        utc,
        timezone_info: "UTC".to_string(),
        julian_day: datetime_to_julian_day(utc),
    }
}

fn positions() -> PositionsOnly {
    let bodies = [
        BodyPosition::new(345.0, 0.98),
        BodyPosition::new(105.0, 13.0),
        BodyPosition::new(355.0, 1.2),
        BodyPosition::new(50.0, 1.1),
        BodyPosition::new(310.0, 0.7),
        BodyPosition::new(160.0, 0.2),
        BodyPosition::new(14.0, 0.1),
    ];
    PositionsOnly {
        bodies,
        frame: HouseFrame::equal(10.0),
    }
}

fn sky(builder: &ChartBuilder, positions: &PositionsOnly) -> SkyContext {
    SkyContext {
        sun_altitude: 30.0,
        moon_speed: builder.moon_speed(positions),
        stations: StationTable::new(),
        planetary_hour: None,
    }
}

fn bench_assemble_chart(c: &mut Criterion) {
    let settings = HorarySettings::bundled().unwrap();
    let builder = ChartBuilder::new(&settings);
    let location = GeoLocation { lat: 51.5, lon: -0.12 };

    c.bench_function("assemble_chart", |b| {
        b.iter(|| {
            let positions = positions();
            let sky = sky(&builder, &positions);
            builder.assemble(black_box(positions), moment(), location, "London", sky)
        })
    });
}

fn bench_compute_aspects(c: &mut Criterion) {
    let settings = HorarySettings::bundled().unwrap();
    let builder = ChartBuilder::new(&settings);
    let positions = positions();
    let sky = sky(&builder, &positions);
    let chart = builder.assemble(positions, moment(), GeoLocation { lat: 51.5, lon: -0.12 }, "London", sky);
    let calculator = AspectCalculator::new(&settings);

    c.bench_function("compute_aspects", |b| {
        b.iter(|| calculator.compute_aspects(black_box(&chart.planets), chart.julian_day, &chart.sky.stations))
    });
}

fn bench_classify_question(c: &mut Criterion) {
    let classifier = KeywordClassifier::new();

    c.bench_function("classify_question", |b| {
        b.iter(|| classifier.classify(black_box("Will my son pass his university exam this summer?")))
    });
}

fn bench_judgment_pipeline(c: &mut Criterion) {
    let settings = HorarySettings::bundled().unwrap();
    let builder = ChartBuilder::new(&settings);
    let positions = positions();
    let sky = sky(&builder, &positions);
    let chart = builder.assemble(positions, moment(), GeoLocation { lat: 51.5, lon: -0.12 }, "London", sky);
    let analysis = KeywordClassifier::new().classify("Will I get the job?");

    c.bench_function("judgment_pipeline", |b| {
        b.iter(|| JudgmentPipeline::new(&settings, black_box(&chart), &analysis, JudgmentOverrides::default()).run())
    });
}

criterion_group!(
    benches,
    bench_assemble_chart,
    bench_compute_aspects,
    bench_classify_question,
    bench_judgment_pipeline
);
criterion_main!(benches);
