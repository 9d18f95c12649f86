//! Builds a miniature PPMI study-data directory: every vendor CSV the loaders
//! read, two participants, two visits, all questionnaire items answered.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const PARTICIPANTS: [&str; 2] = ["1001", "1002"];
pub const VISITS: [(&str, &str); 2] = [("BL", "01/2020"), ("V04", "01/2021")];

fn range_items(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

fn named_items(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Writes one questionnaire file with every item set to `value` on every
/// participant-visit row.
fn write_instrument(dir: &Path, file: &str, page: &str, items: &[String], value: u32) {
    let mut csv = format!("PATNO,EVENT_ID,INFODT,PAG_NAME,{}\n", items.join(","));
    for patno in PARTICIPANTS {
        for (visit, date) in VISITS {
            write!(csv, "{patno},{visit},{date},{page}").unwrap();
            for _ in items {
                write!(csv, ",{value}").unwrap();
            }
            csv.push('\n');
        }
    }
    fs::write(dir.join(file), csv).unwrap();
}

pub fn write_studydata(dir: &Path) {
    write_behavior_files(dir);
    write_date_files(dir);
    write_biospecimen_files(dir);
    write_datscan_file(dir);
    write_demographic_files(dir);
}

fn write_behavior_files(dir: &Path) {
    write_instrument(
        dir,
        "Benton_Judgment_of_Line_Orientation.csv",
        "BENTONOD",
        &range_items("BJLOT", 30),
        1,
    );
    write_instrument(
        dir,
        "Epworth_Sleepiness_Scale.csv",
        "EPWORTH",
        &range_items("ESS", 8),
        1,
    );
    write_instrument(
        dir,
        "Geriatric_Depression_Scale__Short_.csv",
        "GDSSHORT",
        &named_items(&[
            "GDSSATIS", "GDSGSPIR", "GDSHAPPY", "GDSALIVE", "GDSENRGY", "GDSDROPD", "GDSEMPTY",
            "GDSBORED", "GDSAFRAD", "GDSHLPLS", "GDSHOME", "GDSMEMRY", "GDSWRTLS", "GDSHOPLS",
            "GDSBETER",
        ]),
        1,
    );
    write_instrument(
        dir,
        "Hopkins_Verbal_Learning_Test.csv",
        "HVLT",
        &named_items(&[
            "HVLTRT1", "HVLTRT2", "HVLTRT3", "HVLTREC", "HVLTFPRL", "HVLTFPUN", "HVLTRDLY",
        ]),
        1,
    );
    let lns: Vec<String> = (1..=7)
        .flat_map(|i| ["A", "B", "C"].map(|c| format!("LNS{i}{c}")))
        .collect();
    write_instrument(dir, "Letter_-_Number_Sequencing__PD_.csv", "LNSPD", &lns, 1);
    write_instrument(
        dir,
        "Montreal_Cognitive_Assessment__MoCA_.csv",
        "MOCA",
        &named_items(&[
            "MCAALTTM", "MCACUBE", "MCACLCKC", "MCACLCKN", "MCACLCKH", "MCALION", "MCARHINO",
            "MCACAMEL", "MCAFDS", "MCABDS", "MCAVIGIL", "MCASER7", "MCASNTNC", "MCAVF",
            "MCAABSTR", "MCAREC1", "MCAREC2", "MCAREC3", "MCAREC4", "MCAREC5", "MCADATE",
            "MCAMONTH", "MCAYR", "MCADAY", "MCAPLACE", "MCACITY",
        ]),
        1,
    );
    write_instrument(
        dir,
        "MDS_UPDRS_Part_I.csv",
        "NUPDRS1",
        &named_items(&["NP1COG", "NP1HALL", "NP1DPRS", "NP1ANXS", "NP1APAT", "NP1DDS"]),
        1,
    );
    write_instrument(
        dir,
        "MDS_UPDRS_Part_I__Patient_Questionnaire.csv",
        "NUPDRS1P",
        &named_items(&[
            "NP1SLPN", "NP1SLPD", "NP1PAIN", "NP1URIN", "NP1CNST", "NP1LTHD", "NP1FATG",
        ]),
        1,
    );
    write_instrument(
        dir,
        "MDS_UPDRS_Part_II__Patient_Questionnaire.csv",
        "NUPDRS2P",
        &named_items(&[
            "NP2SPCH", "NP2SALV", "NP2SWAL", "NP2EAT", "NP2DRES", "NP2HYGN", "NP2HWRT",
            "NP2HOBB", "NP2TURN", "NP2TRMR", "NP2RISE", "NP2WALK", "NP2FREZ",
        ]),
        1,
    );
    write_updrs_part_iii(dir);
    write_instrument(
        dir,
        "MDS_UPDRS_Part_IV.csv",
        "NUPDRS4",
        &named_items(&[
            "NP4WDYSK", "NP4DYSKI", "NP4OFF", "NP4FLCTI", "NP4FLCTX", "NP4DYSTN",
        ]),
        1,
    );
    write_instrument(
        dir,
        "QUIP_Current_Short.csv",
        "QUIPCS",
        &named_items(&[
            "CNTRLGMB", "TMGAMBLE", "CNTRLSEX", "TMSEX", "CNTRLBUY", "TMBUY", "CNTRLEAT",
            "TMEAT", "TMTORACT", "TMTMTACT", "TMTRWD",
        ]),
        1,
    );
    write_instrument(
        dir,
        "REM_Sleep_Disorder_Questionnaire.csv",
        "REMSLEEP",
        &named_items(&[
            "DRMVIVID", "DRMAGRAC", "DRMNOCTB", "SLPLMBMV", "SLPINJUR", "DRMVERBL", "DRMFIGHT",
            "DRMUMV", "DRMOBJFL", "MVAWAKEN", "DRMREMEM", "SLPDSTRB", "STROKE", "HETRA",
            "PARKISM", "RLS", "NARCLPSY", "DEPRS", "EPILEPSY", "BRNINFM", "CNSOTH",
        ]),
        1,
    );
    write_instrument(dir, "SCOPA-AUT.csv", "SCOPAAUT", &range_items("SCAU", 25), 1);
    write_instrument(
        dir,
        "Modified_Schwab_+_England_ADL.csv",
        "MODSEADL",
        &named_items(&["MSEADLG"]),
        1,
    );
    write_instrument(
        dir,
        "Semantic_Fluency.csv",
        "SFT",
        &named_items(&["VLTANIM", "VLTVEG", "VLTFRUIT"]),
        1,
    );
    write_instrument(
        dir,
        "State-Trait_Anxiety_Inventory.csv",
        "STAIAD",
        &range_items("STAIAD", 40),
        1,
    );
    write_instrument(
        dir,
        "Symbol_Digit_Modalities.csv",
        "SDM",
        &named_items(&["SDMTOTAL"]),
        1,
    );
    write_instrument(
        dir,
        "Vital_Signs.csv",
        "VITALS",
        &named_items(&["SYSSUP", "SYSSTND"]),
        1,
    );
    write_instrument(
        dir,
        "University_of_Pennsylvania_Smell_ID_Test.csv",
        "UPSIT",
        &range_items("UPSITBK", 4),
        1,
    );
}

/// Part III carries pre- and post-treatment exams as separate pages of the
/// same visit; post-treatment items are answered 2 so the split is visible.
fn write_updrs_part_iii(dir: &Path) {
    let items = named_items(&[
        "NP3SPCH", "NP3FACXP", "NP3RIGN", "NP3RIGRU", "NP3RIGLU", "PN3RIGRL", "NP3RIGLL",
        "NP3FTAPR", "NP3FTAPL", "NP3HMOVR", "NP3HMOVL", "NP3PRSPR", "NP3PRSPL", "NP3TTAPR",
        "NP3TTAPL", "NP3LGAGR", "NP3LGAGL", "NP3RISNG", "NP3GAIT", "NP3FRZGT", "NP3PSTBL",
        "NP3POSTR", "NP3BRADY", "NP3PTRMR", "NP3PTRML", "NP3KTRMR", "NP3KTRML", "NP3RTARU",
        "NP3RTALU", "NP3RTARL", "NP3RTALL", "NP3RTALJ", "NP3RTCON",
    ]);
    let mut csv = format!("PATNO,EVENT_ID,INFODT,PAG_NAME,{}\n", items.join(","));
    for patno in PARTICIPANTS {
        for (visit, date) in VISITS {
            for (page, value) in [("NUPDRS3", 1), ("NUPDRS3A", 2)] {
                write!(csv, "{patno},{visit},{date},{page}").unwrap();
                for _ in &items {
                    write!(csv, ",{value}").unwrap();
                }
                csv.push('\n');
            }
        }
    }
    fs::write(dir.join("MDS_UPDRS_Part_III.csv"), csv).unwrap();
}

fn write_date_files(dir: &Path) {
    for file in ["Inclusion_Exclusion.csv", "Signature_Form.csv"] {
        let mut csv = "PATNO,EVENT_ID,INFODT\n".to_string();
        for patno in PARTICIPANTS {
            for (visit, date) in VISITS {
                writeln!(csv, "{patno},{visit},{date}").unwrap();
            }
        }
        fs::write(dir.join(file), csv).unwrap();
    }
    // Socio-Economics doubles as a date file, the education indicator source
    // and the handedness/education demographics source
    let mut csv = "PATNO,EVENT_ID,INFODT,PAG_NAME,EDUCYRS,HANDED\n".to_string();
    for (patno, educyrs, handed) in [("1001", 12, 1), ("1002", 16, 2)] {
        for (visit, date) in VISITS {
            writeln!(csv, "{patno},{visit},{date},SOCIOECO,{educyrs},{handed}").unwrap();
        }
    }
    fs::write(dir.join("Socio-Economics.csv"), csv).unwrap();
}

fn write_biospecimen_files(dir: &Path) {
    let mut csv = "PATNO,CLINICAL_EVENT,TESTNAME,TESTVALUE\n".to_string();
    for patno in PARTICIPANTS {
        for (visit, _) in VISITS {
            for (test, value) in [
                ("ABeta 1-42", "600"),
                ("CSF Alpha-synuclein", "1500"),
                ("pTau", "21"),
                ("tTau", "150"),
            ] {
                writeln!(csv, "{patno},{visit},{test},{value}").unwrap();
            }
        }
    }
    fs::write(dir.join("Current_Biospecimen_Analysis_Results.csv"), csv).unwrap();

    let mut csv = "PATNO,EVENT_ID,INFODT\n".to_string();
    for patno in PARTICIPANTS {
        for (visit, date) in VISITS {
            writeln!(csv, "{patno},{visit},{date}").unwrap();
        }
    }
    fs::write(dir.join("Lumbar_Puncture_Sample_Collection.csv"), csv).unwrap();
}

fn write_datscan_file(dir: &Path) {
    let mut csv = "PATNO,EVENT_ID,SCAN_DATE,CAUDATE_R,CAUDATE_L,PUTAMEN_R,PUTAMEN_L\n".to_string();
    for patno in PARTICIPANTS {
        for (visit, _) in VISITS {
            writeln!(csv, "{patno},{visit},2020-06-15,2.9,3.1,1.5,1.4").unwrap();
        }
    }
    fs::write(dir.join("DATScan_Analysis.csv"), csv).unwrap();
}

fn write_demographic_files(dir: &Path) {
    fs::write(
        dir.join("Patient_Status.csv"),
        "PATNO,ENROLL_CAT,ENROLL_STATUS\n1001,PD,Enrolled\n1002,HC,Enrolled\n",
    )
    .unwrap();
    fs::write(
        dir.join("Randomization_table.csv"),
        "PATNO,BIRTHDT,ENROLLDT,GENDER\n1001,05/1950,01/2020,2\n1002,01/1960,01/2020,1\n",
    )
    .unwrap();
    fs::write(dir.join("PD_Features.csv"), "PATNO,PDDXDT\n1001,01/2019\n").unwrap();
    fs::write(
        dir.join("Family_History__PD_.csv"),
        "PATNO,BIOMOMPD,BIODADPD,FULSIBPD,HAFSIBPD,MAGPARPD,PAGPARPD,MATAUPD,PATAUPD,KIDSPD\n\
         1001,0,1,0,0,0,0,0,0,0\n\
         1002,0,0,0,0,0,0,0,0,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("Screening___Demographics.csv"),
        "PATNO,RAINDALS,RAASIAN,RABLACK,RAHAWOPI,RAWHITE,RANOS\n\
         1001,0,0,0,0,1,0\n\
         1002,0,1,0,0,1,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("Center-Subject_List.csv"),
        "PATNO,CNO\n1001,12\n1002,17\n",
    )
    .unwrap();
}
