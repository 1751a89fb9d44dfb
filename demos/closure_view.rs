use std::env;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use flate2::read::GzDecoder;
use seqclosure as closure;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let src = env::args().nth(1).expect("missing src");

    let set_ids: Vec<usize> = env::args()
        .skip(2)
        .map(|s| {
            s.parse::<usize>()
                .unwrap_or_else(|_| panic!("could not parse set id: {s}"))
        })
        .collect();

    let set_ids = if set_ids.is_empty() {
        None
    } else {
        Some(set_ids)
    };

    let file = File::open(&src)?;
    let inner: Box<dyn BufRead> = if src.ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut reader = closure::Reader::new(inner);
    let problem = reader.read_problem()?;
    let mut engine = problem.builder()?.try_build()?;

    let mut rejected = 0usize;
    for fact in problem.facts() {
        if !engine.try_add_fact(fact)? {
            rejected += 1;
        }
    }

    let mut builder = Builder::default();

    let mut header = vec![String::from("Set"), String::from("Members")];
    header.extend(
        engine
            .lengths()
            .iter()
            .enumerate()
            .map(|(z, length)| format!("Seq {z} (len {length})")),
    );
    builder.push_record(header);

    for id in 0..engine.set_count() {
        if let Some(ref set_ids) = set_ids {
            if !set_ids.contains(&id) {
                continue;
            }
        }

        // SAFETY: `id` is below the number of live sets.
        let set = engine.set(id).unwrap();
        let frontiers = engine.frontiers(id).unwrap();

        let mut record = vec![id.to_string(), set.to_string()];
        record.extend(frontiers.iter().zip(engine.lengths()).map(|(frontier, length)| {
            format!(
                "{}..{} ({}, {})",
                frontier.pred(),
                frontier.succ(),
                frontier.pred().to_one_based(),
                frontier.succ().to_one_based(*length)
            )
        }));

        builder.push_record(record);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);
    println!(
        "{} fact(s) read, {} rejected as inconsistent, {} set(s)",
        problem.facts().len(),
        rejected,
        engine.set_count()
    );

    Ok(())
}
