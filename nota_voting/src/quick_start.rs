/*!

# Quick start with Google Forms

This example runs an election end to end, using an online form to collect the votes.

We would like to fill 2 positions from 3 candidates: Alice, Bob and Charlie. Voters may also
prefer nobody, so the form offers a fourth option, "None of the above".

**Creating a poll** Create a new form with a **Multiple Choice Grid** question. The rows are
the candidates (`Alice`, `Bob`, `Charlie`, `None of the above`) and the columns are the ranks
(`Rank 1`, `Rank 2`, ...). Enable "Limit to one response per column" so that a voter can only
put ties on purpose by leaving rows blank.

**Getting the results** When the poll is closed, open the responses and download them as a CSV
file. The first columns hold the timestamp and the email address of the voter, then one
column per candidate:

```text
Timestamp,Email Address,Who should be elected? [Alice],Who should be elected? [Bob],...
2023/03/01 10:00:00,alice@example.org,Rank 1,Rank 3,Rank 2,
```

**Converting the votes**

```bash
judgevote convert --input responses.csv --output ballots.json \
  --column a=2 --column b=3 --column c=4 --column n=5 \
  --exclude-voter test@example.org
```

Identical ballots are merged, and each blank cell puts the candidate in a shared last rank.

**Running the count** Write the configuration next to the ballots:

```text
{
  "candidates": {"a": "Alice", "b": "Bob", "c": "Charlie", "n": "None of the above"},
  "positions": 2,
  "votefile": "ballots.json"
}
```

and run:

```bash
judgevote tally election.json --out summary.json
```

The report lists the pairwise results, the candidates removed for losing against
"None of the above", and the winners:

```text
Candidates:
   - a: Alice
   - b: Bob
   - c: Charlie
   - n: None of the above
Number of winners: 2
Total number of votes cast: 12
Pairwise results:
   - Alice vs Bob: Alice (4)
   ...
Removed due to losing to None of the Above:
   - Charlie
Winners (in no particular order):
   - Alice
   - Bob
```

See the [manual](../manual/index.html) for all the options.

*/
