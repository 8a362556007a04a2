// ---------------------------------------------------------------------------
// Column names of the class snapshot
// ---------------------------------------------------------------------------

/// Ordered semesters with a grade-point column in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Semester {
    First,
    Second,
    Third,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::First, Semester::Second, Semester::Third];

    /// Display label used on the trend chart's x axis.
    pub fn label(self) -> &'static str {
        match self {
            Semester::First => "第一学期",
            Semester::Second => "第二学期",
            Semester::Third => "第三学期",
        }
    }
}

/// Fields that are coerced to numbers at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Moral,
    Intellectual,
    Fitness,
    Bonus,
    Total,
    Gpa(Semester),
}

impl NumericField {
    pub const ALL: [NumericField; 8] = [
        NumericField::Moral,
        NumericField::Intellectual,
        NumericField::Fitness,
        NumericField::Bonus,
        NumericField::Total,
        NumericField::Gpa(Semester::First),
        NumericField::Gpa(Semester::Second),
        NumericField::Gpa(Semester::Third),
    ];

    /// Candidate columns, in order of preference. The first one present in
    /// the header row is used for every record of the snapshot.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            NumericField::Moral => &["德育"],
            NumericField::Intellectual => &["智育"],
            NumericField::Fitness => &["体测成绩"],
            NumericField::Bonus => &["附加分", "23-24附加分"],
            NumericField::Total => &["测评总分"],
            NumericField::Gpa(Semester::First) => &["第一学期绩点"],
            NumericField::Gpa(Semester::Second) => &["第二学期绩点"],
            NumericField::Gpa(Semester::Third) => &["第三学期绩点"],
        }
    }
}

/// Fields kept as display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextField {
    Name,
    StudentId,
    Class,
    Gender,
    Major,
    Counselor,
    PoliticalStatus,
    Ethnicity,
    Assistance,
    Difficulty,
    PsychLevel,
    HardshipYear1,
    HardshipYear2,
    HardshipGroup,
    Scholarship,
    Grant,
    Awards,
}

impl TextField {
    pub const ALL: [TextField; 17] = [
        TextField::Name,
        TextField::StudentId,
        TextField::Class,
        TextField::Gender,
        TextField::Major,
        TextField::Counselor,
        TextField::PoliticalStatus,
        TextField::Ethnicity,
        TextField::Assistance,
        TextField::Difficulty,
        TextField::PsychLevel,
        TextField::HardshipYear1,
        TextField::HardshipYear2,
        TextField::HardshipGroup,
        TextField::Scholarship,
        TextField::Grant,
        TextField::Awards,
    ];

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TextField::Name => &["姓名"],
            TextField::StudentId => &["学号"],
            TextField::Class => &["班级_基本信息"],
            TextField::Gender => &["性别"],
            TextField::Major => &["分流专业", "原专业"],
            TextField::Counselor => &["辅导员"],
            TextField::PoliticalStatus => &["政治面貌"],
            TextField::Ethnicity => &["民族"],
            TextField::Assistance => &["有无需要学院协助解决的困难"],
            TextField::Difficulty => &["有何困难"],
            TextField::PsychLevel => &["最新心理等级"],
            TextField::HardshipYear1 => &["第一学年困难等级"],
            TextField::HardshipYear2 => &["第二学年困难等级"],
            TextField::HardshipGroup => &["困难保障人群"],
            TextField::Scholarship => &["人民奖学金"],
            // A second "助学金" column is renamed "助学金.1" on load.
            TextField::Grant => &["助学金", "助学金.1"],
            TextField::Awards => &["奖项"],
        }
    }
}

/// Literal meaning "none" in the assistance column.
pub const NO_DIFFICULTY: &str = "无";
