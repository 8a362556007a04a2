use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

const SURNAMES: [&str; 12] = ["张", "王", "李", "赵", "刘", "陈", "杨", "黄", "周", "吴", "徐", "孙"];
const GIVEN: [&str; 10] = ["伟", "芳", "娜", "敏", "静", "磊", "洋", "艳", "杰", "涛"];
const CLASSES: [&str; 2] = ["计科2101", "计科2102"];
const PSYCH: [&str; 3] = ["一级", "二级", "三级"];
const HARDSHIP: [&str; 3] = ["一般困难", "困难", "特别困难"];

const TEXT_COLUMNS: [&str; 16] = [
    "学号", "姓名", "班级_基本信息", "性别", "分流专业", "辅导员", "政治面貌", "民族",
    "有无需要学院协助解决的困难", "有何困难", "最新心理等级", "第一学年困难等级",
    "第二学年困难等级", "困难保障人群", "人民奖学金", "助学金",
];
const NUMBER_COLUMNS: [&str; 8] = [
    "德育", "智育", "体测成绩", "附加分", "测评总分", "第一学期绩点", "第二学期绩点", "第三学期绩点",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

/// One generated student: text cells then numeric cells, in column order.
struct Row {
    text: Vec<Option<String>>,
    numbers: Vec<Option<f64>>,
}

fn generate_row(rng: &mut SimpleRng, i: usize) -> Row {
    let needs_help = rng.chance(0.2);
    let hardship = rng.chance(0.25);
    let opt = |cond: bool, v: &str| cond.then(|| v.to_string());

    let text = vec![
        Some(format!("S{:03}", i + 1)),
        Some(format!("{}{}", rng.pick(&SURNAMES), rng.pick(&GIVEN))),
        Some(rng.pick(&CLASSES).to_string()),
        Some(rng.pick(&["男", "女"]).to_string()),
        Some(rng.pick(&["计算机科学与技术", "软件工程", "人工智能"]).to_string()),
        Some("李老师".to_string()),
        Some(rng.pick(&["共青团员", "中共党员", "群众"]).to_string()),
        Some(rng.pick(&["汉族", "汉族", "汉族", "回族", "壮族"]).to_string()),
        Some(if needs_help { "有".to_string() } else { "无".to_string() }),
        opt(needs_help, rng.pick(&["家庭经济困难", "学业压力大", "身体原因"])),
        Some(rng.pick(&PSYCH).to_string()),
        opt(hardship, rng.pick(&HARDSHIP)),
        opt(hardship, rng.pick(&HARDSHIP)),
        opt(hardship && rng.chance(0.3), "低保家庭"),
        opt(rng.chance(0.15), rng.pick(&["一等", "二等", "三等"])),
        opt(hardship && rng.chance(0.6), rng.pick(&["一等助学金", "二等助学金"])),
    ];

    let moral = round_to(rng.uniform(12.0, 15.0), 1);
    let intellectual = round_to(rng.uniform(55.0, 95.0), 1);
    let fitness = round_to(rng.uniform(65.0, 115.0), 0);
    let bonus = round_to(rng.uniform(-1.0, 6.0), 1);
    let total = round_to(moral + intellectual * 0.7 + fitness * 0.1 + bonus, 1);
    let base_gpa = rng.uniform(2.2, 3.8);
    let gpa = |drift: f64| round_to((base_gpa + drift).clamp(0.0, 4.0), 2);
    let gpas = [
        Some(gpa(rng.uniform(-0.3, 0.3))),
        Some(gpa(rng.uniform(-0.3, 0.3))),
        // Third semester not yet graded for some students.
        (!rng.chance(0.3)).then(|| gpa(rng.uniform(-0.3, 0.3))),
    ];

    let mut numbers = vec![Some(moral), Some(intellectual), Some(fitness), Some(bonus), Some(total)];
    numbers.extend(gpas);
    Row { text, numbers }
}

fn write_xlsx(rows: &[Row], path: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, name) in TEXT_COLUMNS.iter().chain(NUMBER_COLUMNS.iter()).enumerate() {
        sheet.write_string(0, c as u16, *name)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, cell) in row.text.iter().enumerate() {
            if let Some(v) = cell {
                sheet.write_string(r, c as u16, v.as_str())?;
            }
        }
        for (c, cell) in row.numbers.iter().enumerate() {
            if let Some(v) = cell {
                sheet.write_number(r, (TEXT_COLUMNS.len() + c) as u16, *v)?;
            }
        }
    }

    workbook.save(path).context("writing xlsx")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (c, name) in TEXT_COLUMNS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Utf8, true));
        let values: Vec<Option<&str>> = rows.iter().map(|r| r.text[c].as_deref()).collect();
        columns.push(Arc::new(StringArray::from(values)));
    }
    for (c, name) in NUMBER_COLUMNS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.numbers[c]).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..40).map(|i| generate_row(&mut rng, i)).collect();

    write_xlsx(&rows, "students.xlsx")?;
    write_parquet(&rows, "students.parquet")?;

    println!("Wrote {} students to students.xlsx and students.parquet", rows.len());
    Ok(())
}
